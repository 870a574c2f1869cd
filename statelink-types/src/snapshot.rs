//! Persisted state snapshots.
//!
//! A snapshot is what goes into the key-value store: the state object plus
//! the wall-clock time it was written, so stale entries can be discarded on
//! read. Expiry is a passive age comparison, there is no timer anywhere.

use crate::state::StateObject;
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch.
#[must_use]
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// A timestamped state object, as serialized to persistent storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// The persisted state.
    pub state: StateObject,
    /// Write time, milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl Snapshot {
    /// Creates a snapshot of `state` taken now.
    #[must_use]
    pub fn new(state: StateObject) -> Self {
        Self {
            state,
            timestamp: now_millis(),
        }
    }

    /// Creates a snapshot with an explicit timestamp (for tests or replay).
    #[must_use]
    pub fn with_timestamp(state: StateObject, timestamp: u64) -> Self {
        Self { state, timestamp }
    }

    /// Returns true if this snapshot is older than `ttl` as of `now`.
    ///
    /// A timestamp in the future (clock skew) counts as not expired.
    #[must_use]
    pub fn is_expired(&self, now: u64, ttl: Duration) -> bool {
        now.saturating_sub(self.timestamp) > ttl.as_millis() as u64
    }

    /// Serializes the snapshot to its storage text form.
    pub fn to_blob(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a snapshot from its storage text form.
    pub fn from_blob(blob: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(blob)?)
    }
}
