use burrow_core::{CounterError, StorageError};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    /// No record exists for the short code. Callers map this to "not found".
    #[error("short code not found: {0}")]
    NotFound(String),
    #[error("failed to increment counter: {0}")]
    Allocation(#[from] CounterError),
    #[error("failed to {operation}: {source}")]
    Storage {
        operation: &'static str,
        #[source]
        source: StorageError,
    },
}

impl ShortenerError {
    pub(crate) fn storage(operation: &'static str) -> impl FnOnce(StorageError) -> Self {
        move |source| Self::Storage { operation, source }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
