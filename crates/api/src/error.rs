use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tixer_core::decode::DecodeError;
use tixer_core::error::{CoreError, ErrorCode};
use tixer_core::public_id::PublicIdError;
use tixer_db::error::RepoError;

use crate::response::{error_response, internal_error_response, ErrorEnvelope};

pub(crate) const NOT_FOUND_MESSAGE: &str = "the requested resource could not be found";
const EDIT_CONFLICT_MESSAGE: &str =
    "unable to update the record due to an edit conflict, please try again";

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain, repository and decoding errors and implements
/// [`IntoResponse`] to produce the `{"error": {...}}` envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `tixer_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A repository error from `tixer_db`.
    #[error(transparent)]
    Repo(#[from] RepoError),

    /// The request body could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The `{id}` path segment is not a valid public identifier.
    #[error(transparent)]
    InvalidId(#[from] PublicIdError),

    /// An internal error with a server-side-only message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, envelope) = match self {
            // --- CoreError variants ---
            AppError::Core(CoreError::Invalid(msg)) => invalid(msg),
            AppError::Core(CoreError::Validation(fields)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorEnvelope::validations(fields),
            ),

            // --- Repository errors ---
            AppError::Repo(RepoError::NotFound) => not_found(),
            AppError::Repo(RepoError::EditConflict) => (
                StatusCode::CONFLICT,
                ErrorEnvelope::message(ErrorCode::Conflict, EDIT_CONFLICT_MESSAGE),
            ),
            AppError::Repo(err) => {
                tracing::error!(error = %err, "Repository error");
                return internal_error_response();
            }

            // --- Request errors ---
            AppError::Decode(err) => invalid(err.to_string()),
            AppError::InvalidId(err) => invalid(err.to_string()),

            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                return internal_error_response();
            }
        };

        error_response(status, &envelope)
    }
}

fn not_found() -> (StatusCode, ErrorEnvelope) {
    (
        StatusCode::NOT_FOUND,
        ErrorEnvelope::message(ErrorCode::NotFound, NOT_FOUND_MESSAGE),
    )
}

fn invalid(message: String) -> (StatusCode, ErrorEnvelope) {
    (
        StatusCode::BAD_REQUEST,
        ErrorEnvelope::message(ErrorCode::Invalid, message),
    )
}
