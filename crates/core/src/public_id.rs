//! Externally exposed ticket identifiers.
//!
//! The internal BIGSERIAL key never leaves the database layer. Clients only
//! ever see a [`PublicId`]: a fixed-length string drawn from a lowercase
//! alphanumeric alphabet, generated server-side at creation time.

use std::fmt;

use rand::Rng;
use serde::Serialize;

/// Characters a public identifier may contain.
pub const PUBLIC_ID_ALPHABET: &str = "0123456789abcdefghijklmnopqrstuvwxyz";

/// Exact length of every public identifier.
pub const PUBLIC_ID_LENGTH: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PublicIdError {
    #[error("value cannot be blank")]
    Blank,

    #[error("value should be {} characters long", PUBLIC_ID_LENGTH)]
    Length,

    #[error("value has invalid characters")]
    Charset,
}

/// A validated public identifier.
///
/// The only ways to obtain one are [`PublicId::generate`] and
/// [`PublicId::parse`], so holding a `PublicId` means the value is safe to
/// bind into a lookup query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PublicId(String);

impl PublicId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        let alphabet = PUBLIC_ID_ALPHABET.as_bytes();
        let mut rng = rand::rng();
        let id: String = (0..PUBLIC_ID_LENGTH)
            .map(|_| char::from(alphabet[rng.random_range(0..alphabet.len())]))
            .collect();
        Self(id)
    }

    /// Validate an untrusted identifier, typically a path segment.
    pub fn parse(value: &str) -> Result<Self, PublicIdError> {
        if value.is_empty() {
            return Err(PublicIdError::Blank);
        }
        if value.len() != PUBLIC_ID_LENGTH {
            return Err(PublicIdError::Length);
        }
        if !value.bytes().all(|b| PUBLIC_ID_ALPHABET.as_bytes().contains(&b)) {
            return Err(PublicIdError::Charset);
        }
        Ok(Self(value.to_owned()))
    }

    /// Wrap a value read back from storage. Rows are only ever written with
    /// generated identifiers, so no validation is repeated here.
    pub fn from_trusted(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PublicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
