//! Safelist-checked ORDER BY construction.
//!
//! [`Sorter`] is the only place a client-supplied value may influence the
//! column name in a dynamically built ORDER BY clause. Anything outside the
//! caller's safelist is rejected before it gets near SQL.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsafe sort parameter: {0}")]
pub struct UnsafeSortError(pub String);

/// A sort token that has passed the safelist check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sorter {
    token: String,
}

impl Sorter {
    /// Accept `token` only if it appears verbatim (including any leading
    /// `-`) in `safelist`.
    pub fn new(token: &str, safelist: &[&str]) -> Result<Self, UnsafeSortError> {
        if safelist.iter().any(|safe| *safe == token) {
            Ok(Self {
                token: token.to_owned(),
            })
        } else {
            Err(UnsafeSortError(token.to_owned()))
        }
    }

    /// Column name with any `-` prefix stripped.
    pub fn column(&self) -> &str {
        self.token.strip_prefix('-').unwrap_or(&self.token)
    }

    pub fn direction(&self) -> SortDirection {
        if self.token.starts_with('-') {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    /// `"<column> <ASC|DESC>"`, ready to splice after `ORDER BY`.
    pub fn order_clause(&self) -> String {
        format!("{} {}", self.column(), self.direction())
    }
}
