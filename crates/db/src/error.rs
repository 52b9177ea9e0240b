use std::time::Duration;

/// Outcome of a failed repository call.
///
/// `NotFound` and `EditConflict` are the two outcomes callers must branch
/// on; everything else is a storage failure to be reported as internal.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("record not found")]
    NotFound,

    /// The versioned update matched zero rows: either the version moved on
    /// or the row is gone. The two cases are indistinguishable here.
    #[error("edit conflict")]
    EditConflict,

    #[error("query exceeded its {0:?} timeout")]
    Timeout(Duration),

    #[error("query cancelled by caller")]
    Cancelled,

    #[error("{context}: {source}")]
    Database {
        context: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl RepoError {
    pub(crate) fn database(context: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| RepoError::Database { context, source }
    }
}

pub type RepoResult<T> = Result<T, RepoError>;
