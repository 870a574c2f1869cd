//! Error types for the sync layer.

use statelink_types::ValueKind;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur in sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A field name not declared in the configured defaults.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// A value whose kind does not match the field's declared kind.
    #[error("wrong type for field {field}: expected {expected}, got {got}")]
    WrongType {
        field: String,
        expected: ValueKind,
        got: ValueKind,
    },

    /// Storage backend failure.
    #[error("storage error: {0}")]
    Storage(#[from] statelink_storage::StoreError),

    /// Snapshot serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] statelink_types::Error),

    /// A persisted snapshot that could not be parsed.
    #[error("corrupt snapshot: {0}")]
    CorruptSnapshot(String),
}
