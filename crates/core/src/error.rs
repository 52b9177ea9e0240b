use serde::Serialize;

use crate::types::FieldErrors;

/// Stable machine-readable error codes carried in every error envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Conflict,
    Internal,
    Invalid,
    Unprocessable,
    NotFound,
    /// Reserved; nothing emits it yet.
    Unauthorized,
    /// Reserved; nothing emits it yet.
    Forbidden,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Conflict => "conflict",
            ErrorCode::Internal => "internal",
            ErrorCode::Invalid => "invalid",
            ErrorCode::Unprocessable => "unprocessable",
            ErrorCode::NotFound => "not_found",
            ErrorCode::Unauthorized => "unauthorized",
            ErrorCode::Forbidden => "forbidden",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain errors raised while checking client input. Lookup, conflict and
/// storage failures come from the repository as `RepoError`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid input: {0}")]
    Invalid(String),

    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(FieldErrors),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_serialize_to_stable_strings() {
        let all = [
            (ErrorCode::Conflict, "conflict"),
            (ErrorCode::Internal, "internal"),
            (ErrorCode::Invalid, "invalid"),
            (ErrorCode::Unprocessable, "unprocessable"),
            (ErrorCode::NotFound, "not_found"),
            (ErrorCode::Unauthorized, "unauthorized"),
            (ErrorCode::Forbidden, "forbidden"),
        ];
        for (code, expected) in all {
            assert_eq!(code.as_str(), expected);
            assert_eq!(
                serde_json::to_value(code).unwrap(),
                serde_json::Value::String(expected.to_string())
            );
        }
    }

    #[test]
    fn validation_reports_field_count() {
        let mut fields = FieldErrors::new();
        fields.insert("price".into(), "must be greater than zero".into());
        fields.insert("title".into(), "must be provided".into());
        assert_eq!(
            CoreError::Validation(fields).to_string(),
            "Validation failed for 2 field(s)"
        );
    }
}
