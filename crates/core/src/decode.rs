//! Strict JSON request-body decoding.
//!
//! Exactly one JSON value, no unknown keys (destination types opt in with
//! `#[serde(deny_unknown_fields)]`), bounded size. Every failure is a
//! [`DecodeError`] with a message that is safe to return to the client.

use serde::de::DeserializeOwned;
use serde_json::error::Category;
use serde_path_to_error::Segment;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("body must not be empty")]
    Empty,

    #[error("body must not be larger than {limit} bytes")]
    TooLarge { limit: usize },

    #[error("body contains badly-formed JSON (at character {offset})")]
    Syntax { offset: usize },

    #[error("body contains badly-formed JSON")]
    Truncated,

    #[error("body contains incorrect JSON type for field \"{0}\"")]
    IncorrectFieldType(String),

    #[error("body contains incorrect JSON type (at character {offset})")]
    IncorrectType { offset: usize },

    #[error("body contains unknown key \"{0}\"")]
    UnknownField(String),

    #[error("body is missing key \"{0}\"")]
    MissingField(String),

    #[error("body must only contain a single JSON value")]
    MultipleValues,

    #[error("failed to read request body: {0}")]
    Read(String),
}

/// Decode `body` into `T`, enforcing `limit` bytes.
pub fn decode_json<T: DeserializeOwned>(body: &[u8], limit: usize) -> Result<T, DecodeError> {
    if body.len() > limit {
        return Err(DecodeError::TooLarge { limit });
    }
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(DecodeError::Empty);
    }

    let mut de = serde_json::Deserializer::from_slice(body);
    let value = serde_path_to_error::deserialize(&mut de).map_err(|err| {
        let field = err
            .path()
            .iter()
            .any(|segment| matches!(segment, Segment::Map { .. }))
            .then(|| err.path().to_string());
        classify(err.inner(), field, body)
    })?;
    de.end().map_err(|_| DecodeError::MultipleValues)?;

    Ok(value)
}

/// `field` is the path to the offending value when it sits under an object
/// key; mismatches outside any object are reported by offset.
fn classify(err: &serde_json::Error, field: Option<String>, body: &[u8]) -> DecodeError {
    let offset = byte_offset(body, err.line(), err.column());
    match err.classify() {
        Category::Eof => DecodeError::Truncated,
        Category::Syntax => DecodeError::Syntax { offset },
        Category::Data => {
            let message = err.to_string();
            if let Some(field) = quoted_name_after(&message, "unknown field ") {
                DecodeError::UnknownField(field)
            } else if let Some(field) = quoted_name_after(&message, "missing field ") {
                DecodeError::MissingField(field)
            } else if let Some(field) = field {
                DecodeError::IncorrectFieldType(field)
            } else {
                DecodeError::IncorrectType { offset }
            }
        }
        Category::Io => DecodeError::Read(err.to_string()),
    }
}

/// serde reports field names as `` `name` `` following a fixed prefix.
fn quoted_name_after(message: &str, prefix: &str) -> Option<String> {
    let rest = message.strip_prefix(prefix)?.strip_prefix('`')?;
    let end = rest.find('`')?;
    Some(rest[..end].to_owned())
}

/// Translate serde_json's 1-based line/column into a byte offset.
fn byte_offset(body: &[u8], line: usize, column: usize) -> usize {
    let preceding: usize = body
        .split(|b| *b == b'\n')
        .take(line.saturating_sub(1))
        .map(|l| l.len() + 1)
        .sum();
    preceding + column
}
