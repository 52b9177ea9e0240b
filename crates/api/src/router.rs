//! Shared application router builder.
//!
//! Provides [`build_app_router`] so both the production binary (`main.rs`)
//! and integration tests (`tests/common/mod.rs`) use the exact same
//! middleware stack.

use std::any::Any;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method, Request, StatusCode};
use axum::middleware::map_response;
use axum::response::Response;
use axum::Router;
use tixer_core::error::ErrorCode;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::{Level, Span};

use crate::config::{ConfigError, ServerConfig};
use crate::error::NOT_FOUND_MESSAGE;
use crate::response::{error_response, internal_error_response, ErrorEnvelope};
use crate::routes;
use crate::state::AppState;

const REQUEST_ID_HEADER: &str = "x-request-id";
const REQUEST_TIMEOUT_MESSAGE: &str = "the request took too long to process";

/// Build the full application [`Router`] with all middleware layers.
///
/// The middleware stack is applied bottom-up:
///
/// 1. CORS
/// 2. Set request ID on incoming requests
/// 3. Structured request/response tracing
/// 4. Propagate request ID to response
/// 5. Timeout rendering (a bare 408 becomes the error envelope)
/// 6. Request timeout
/// 7. Panic recovery (catch panics, return the 500 envelope)
///
/// Unmatched paths and methods answer with the same envelope as handler
/// errors.
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Result<Router, ConfigError> {
    let cors = build_cors_layer(config)?;
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    let router = Router::new()
        .nest("/v1", routes::api_routes())
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        // -- Middleware stack (applied bottom-up) --
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(map_response(render_timeout))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(make_request_span)
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state);

    Ok(router)
}

/// Build the CORS middleware layer from server configuration.
pub fn build_cors_layer(config: &ServerConfig) -> Result<CorsLayer, ConfigError> {
    let origins = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>().map_err(|e| ConfigError::Invalid {
                key: "CORS_ORIGINS",
                value: o.clone(),
                reason: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(3600)))
}

/// Request span carrying the method, URI and request id, so every event
/// logged while handling the request (including internal errors) has them.
fn make_request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id,
    )
}

async fn route_not_found() -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        &ErrorEnvelope::message(ErrorCode::NotFound, NOT_FOUND_MESSAGE),
    )
}

async fn method_not_allowed(method: Method) -> Response {
    error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        &ErrorEnvelope::message(
            ErrorCode::Invalid,
            format!("the {method} method is not supported for this resource"),
        ),
    )
}

/// `TimeoutLayer` answers with an empty 408; give it the envelope.
async fn render_timeout(response: Response) -> Response {
    if response.status() != StatusCode::REQUEST_TIMEOUT {
        return response;
    }
    tracing::warn!("Request timed out");
    error_response(
        StatusCode::REQUEST_TIMEOUT,
        &ErrorEnvelope::message(ErrorCode::Internal, REQUEST_TIMEOUT_MESSAGE),
    )
}

fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");

    tracing::error!(panic = %detail, "Handler panicked");
    internal_error_response()
}
