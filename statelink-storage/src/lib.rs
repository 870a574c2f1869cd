//! Key-value persistence seam for Statelink.
//!
//! The synchronizer persists snapshots through the [`SnapshotStore`] trait, a
//! deliberately small, synchronous get/put/remove contract keyed by string.
//! Asynchronous backends must be adapted by the caller before construction.
//!
//! Two implementations ship here:
//! - [`MemoryStore`] — in-process map, used in tests and headless embeddings
//! - [`FileStore`] — one file per key under a root directory, atomic writes
//!
//! Errors stay `Result`-shaped inside this crate so callers can distinguish
//! "absent" from "failed"; collapsing failures to "no persisted state" is the
//! synchronizer's decision, not the store's.

mod error;
mod file;
mod memory;

pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::MemoryStore;

/// Synchronous string-keyed blob storage.
///
/// `get` returning `Ok(None)` means the key is absent; `Err` means the
/// backend itself failed (I/O, quota, poisoned lock). Implementations take
/// `&self` so a store can be shared behind an `Arc`.
pub trait SnapshotStore: Send + Sync {
    /// Reads the blob stored under `key`.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Writes `blob` under `key`, replacing any previous value.
    fn put(&self, key: &str, blob: &str) -> StoreResult<()>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StoreResult<()>;
}
