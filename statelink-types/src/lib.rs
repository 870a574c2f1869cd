//! Core type definitions for Statelink.
//!
//! This crate defines the primitives shared by the storage and sync layers:
//! - `FieldValue` — the tagged union of field types a state object can hold
//! - `StateObject` — a fixed-key mapping from field name to value
//! - `Snapshot` — a timestamped state object as persisted to storage
//!
//! Anything that knows about query strings, navigation, or storage backends
//! belongs in the other crates, not here.

mod snapshot;
mod state;
mod value;

pub use snapshot::{Snapshot, now_millis};
pub use state::StateObject;
pub use value::{FieldValue, ValueKind};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
