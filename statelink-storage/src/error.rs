//! Error types for the storage layer.

use thiserror::Error;

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend is unusable (poisoned lock, unavailable host storage).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Key is not valid for this backend.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}
