//! Request extractors shared by the ticket handlers.

use std::convert::Infallible;

use axum::extract::{FromRef, FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use serde::de::DeserializeOwned;
use tixer_core::decode::{decode_json, DecodeError};
use tixer_core::error::CoreError;
use tixer_core::public_id::PublicId;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::error::AppError;
use crate::state::AppState;

/// Maximum accepted request body size in bytes.
#[derive(Debug, Clone, Copy)]
pub struct BodyLimit(pub usize);

// ---------------------------------------------------------------------------
// StrictJson
// ---------------------------------------------------------------------------

/// JSON body extractor that accepts exactly one JSON value within the
/// configured [`BodyLimit`].
///
/// Unknown keys are rejected when the target type carries
/// `#[serde(deny_unknown_fields)]`. All failures reject with
/// [`AppError::Decode`], which renders as 400 `invalid`.
#[derive(Debug)]
pub struct StrictJson<T>(pub T);

impl<S, T> FromRequest<S> for StrictJson<T>
where
    S: Send + Sync,
    BodyLimit: FromRef<S>,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let BodyLimit(limit) = BodyLimit::from_ref(state);

        let bytes = Limited::new(req.into_body(), limit)
            .collect()
            .await
            .map_err(|err| {
                if err.downcast_ref::<LengthLimitError>().is_some() {
                    DecodeError::TooLarge { limit }
                } else {
                    DecodeError::Read(err.to_string())
                }
            })?
            .to_bytes();

        let value = decode_json(&bytes, limit)?;
        Ok(StrictJson(value))
    }
}

// ---------------------------------------------------------------------------
// TicketId
// ---------------------------------------------------------------------------

/// The `{id}` path segment, validated as a public identifier.
#[derive(Debug, Clone)]
pub struct TicketId(pub PublicId);

impl<S> FromRequestParts<S> for TicketId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::Core(CoreError::Invalid(rejection.body_text())))?;

        Ok(TicketId(PublicId::parse(&raw)?))
    }
}

// ---------------------------------------------------------------------------
// RequestScope
// ---------------------------------------------------------------------------

/// Cancellation scope for one request.
///
/// The token is a child of the server's root token, so it fires on forced
/// shutdown. It is also cancelled when the handler future is dropped, which
/// happens when the client goes away mid-request.
pub struct RequestScope {
    token: CancellationToken,
    _guard: DropGuard,
}

impl RequestScope {
    pub fn new(parent: &CancellationToken) -> Self {
        let token = parent.child_token();
        let guard = token.clone().drop_guard();
        Self {
            token,
            _guard: guard,
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl FromRequestParts<AppState> for RequestScope {
    type Rejection = Infallible;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(RequestScope::new(&state.shutdown))
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use tower::ServiceExt;

    use super::*;

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Payload {
        name: String,
    }

    async fn echo(StrictJson(payload): StrictJson<Payload>) -> impl IntoResponse {
        payload.name
    }

    fn app(limit: usize) -> Router {
        Router::new()
            .route("/", post(echo))
            .with_state(BodyLimit(limit))
    }

    async fn send(limit: usize, body: &'static str) -> (StatusCode, String) {
        let response = app(limit)
            .oneshot(
                axum::http::Request::post("/")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn accepts_single_value_within_limit() {
        let (status, body) = send(64, r#"{"name":"gig"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "gig");
    }

    #[tokio::test]
    async fn oversized_body_is_rejected_distinctly() {
        let (status, body) = send(8, r#"{"name":"a much longer value"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("body must not be larger than 8 bytes"), "{body}");
    }

    #[tokio::test]
    async fn unknown_key_is_named() {
        let (status, body) = send(64, r#"{"name":"gig","extra":1}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains(r#"body contains unknown key \"extra\""#), "{body}");
    }

    #[tokio::test]
    async fn second_value_is_rejected() {
        let (status, body) = send(64, r#"{"name":"a"}{"name":"b"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("body must only contain a single JSON value"), "{body}");
    }

    #[test]
    fn request_scope_follows_parent_and_drop() {
        let root = CancellationToken::new();

        let scope = RequestScope::new(&root);
        let token = scope.token().clone();
        assert!(!token.is_cancelled());
        drop(scope);
        assert!(token.is_cancelled());
        assert!(!root.is_cancelled());

        let scope = RequestScope::new(&root);
        root.cancel();
        assert!(scope.token().is_cancelled());
    }
}
