//! Response envelope types and the JSON renderer.
//!
//! Every response body is a JSON object whose top-level key names the
//! payload: `ticket`, `tickets` + `pagination`, `message`, or `error`.
//! Bodies are serialized in full before any status line exists, so a
//! serialization failure can still become a clean 500.

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tixer_core::error::ErrorCode;
use tixer_core::types::FieldErrors;

/// `{ "message": "..." }`
#[derive(Debug, Serialize)]
pub struct MessageEnvelope {
    pub message: String,
}

/// `{ "error": { "code": ..., "message": ... } }` or, for validation
/// failures, `{ "error": { "code": "unprocessable", "validations": {...} } }`.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validations: Option<FieldErrors>,
}

impl ErrorEnvelope {
    pub fn message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code,
                message: Some(message.into()),
                validations: None,
            },
        }
    }

    pub fn validations(validations: FieldErrors) -> Self {
        Self {
            error: ErrorBody {
                code: ErrorCode::Unprocessable,
                message: None,
                validations: Some(validations),
            },
        }
    }
}

/// Serialize `value` as tab-indented JSON with a trailing newline.
pub fn render_json<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::with_capacity(128);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}

/// A JSON envelope with a status code and optional extra headers.
#[derive(Debug)]
pub struct JsonResponse<T> {
    status: StatusCode,
    headers: HeaderMap,
    body: T,
}

impl<T: Serialize> JsonResponse<T> {
    pub fn new(status: StatusCode, body: T) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body,
        }
    }

    pub fn ok(body: T) -> Self {
        Self::new(StatusCode::OK, body)
    }

    pub fn header(mut self, name: axum::http::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

impl<T: Serialize> IntoResponse for JsonResponse<T> {
    fn into_response(self) -> Response {
        match render_json(&self.body) {
            Ok(bytes) => json_bytes_response(self.status, self.headers, bytes),
            Err(err) => {
                tracing::error!(error = %err, "Failed to serialize response body");
                internal_error_response()
            }
        }
    }
}

/// Message returned for every internal failure. Storage or serializer
/// details never reach the client.
pub const INTERNAL_ERROR_MESSAGE: &str =
    "the server encountered a problem and could not process your request";

/// The canonical 500 envelope.
///
/// If even this cannot be rendered, the response is a bare 500 with no
/// body rather than a partially written one.
pub fn internal_error_response() -> Response {
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        &ErrorEnvelope::message(ErrorCode::Internal, INTERNAL_ERROR_MESSAGE),
    )
}

pub(crate) fn error_response(status: StatusCode, envelope: &ErrorEnvelope) -> Response {
    match render_json(envelope) {
        Ok(bytes) => json_bytes_response(status, HeaderMap::new(), bytes),
        Err(err) => {
            tracing::error!(error = %err, "Failed to serialize error body");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn json_bytes_response(status: StatusCode, headers: HeaderMap, bytes: Vec<u8>) -> Response {
    let mut response = (
        status,
        [(CONTENT_TYPE, HeaderValue::from_static("application/json"))],
        bytes,
    )
        .into_response();
    response.headers_mut().extend(headers);
    response
}
