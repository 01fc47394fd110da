use std::time::Duration;

use greenlight_core::filters::UnsafeSort;

/// Failure of a repository call.
///
/// `NotFound` and `EditConflict` are expected outcomes the caller translates
/// into responses. Every other variant is a storage failure: log it, never
/// show its detail to a client.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("record not found")]
    NotFound,

    #[error("edit conflict")]
    EditConflict,

    #[error("query exceeded {0:?} deadline")]
    Timeout(Duration),

    #[error(transparent)]
    UnsafeSort(#[from] UnsafeSort),

    #[error("database error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl DbError {
    /// `true` for the opaque variants that must surface as a generic failure.
    pub fn is_storage_failure(&self) -> bool {
        !matches!(self, DbError::NotFound | DbError::EditConflict)
    }
}
