use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
}

/// Errors raised by a [`CounterStore`](crate::CounterStore) backend.
#[derive(Debug, Clone, Error)]
pub enum CounterError {
    #[error("counter backend unavailable: {0}")]
    Unavailable(String),
    #[error("counter operation timed out: {0}")]
    Timeout(String),
    #[error("counter value is invalid: {0}")]
    InvalidData(String),
    #[error("counter operation failed: {0}")]
    Operation(String),
}

/// Errors raised by a [`Repository`](crate::Repository) backend.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("short code already exists: {0}")]
    Conflict(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}
