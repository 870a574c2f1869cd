//! The synchronizer: one authoritative state object, mirrored outward.
//!
//! A `Synchronizer` owns the in-memory state and keeps two derived surfaces
//! consistent with it: the query string (through a [`Navigator`]) and an
//! expiring persisted snapshot (through a [`SnapshotStore`]). At startup,
//! `initialize` reconciles the three sources with the precedence
//! URL > storage > defaults: the address bar is the explicit, shareable
//! expression of intent and is never overridden by a stale local cache;
//! storage only covers reloads that arrive without query parameters.

use crate::codec::Codec;
use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::navigator::Navigator;
use statelink_storage::SnapshotStore;
use statelink_types::{FieldValue, Snapshot, StateObject, ValueKind, now_millis};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Synchronizes a typed state object across memory, URL, and storage.
///
/// All operations are synchronous and run to completion before returning;
/// navigation and storage writes are fire-and-forget effects. One UI context
/// is assumed to mutate one instance — concurrent writers are last-write-wins
/// by design.
pub struct Synchronizer<N: Navigator> {
    config: SyncConfig,
    /// Resolved codec per URL-mirrored field (override or kind default).
    url_codecs: HashMap<String, Codec>,
    navigator: N,
    store: Option<Arc<dyn SnapshotStore>>,
    state: StateObject,
    initialized: bool,
    tx: watch::Sender<StateObject>,
}

impl<N: Navigator> Synchronizer<N> {
    /// Creates a synchronizer without persisted storage.
    pub fn new(config: SyncConfig, navigator: N) -> SyncResult<Self> {
        Self::build(config, navigator, None)
    }

    /// Creates a synchronizer with a persisted-snapshot store.
    ///
    /// Storage mirroring is still gated on `config.storage_key`.
    pub fn with_store(
        config: SyncConfig,
        navigator: N,
        store: Arc<dyn SnapshotStore>,
    ) -> SyncResult<Self> {
        Self::build(config, navigator, Some(store))
    }

    fn build(
        mut config: SyncConfig,
        navigator: N,
        store: Option<Arc<dyn SnapshotStore>>,
    ) -> SyncResult<Self> {
        for field in &config.url_fields {
            if !config.defaults.contains(field) {
                return Err(SyncError::UnknownField(field.clone()));
            }
        }
        for field in config.codecs.keys() {
            if !config.defaults.contains(field) {
                return Err(SyncError::UnknownField(field.clone()));
            }
        }

        let mut overrides = std::mem::take(&mut config.codecs);
        let mut url_codecs = HashMap::new();
        for field in &config.url_fields {
            let kind = config
                .defaults
                .get(field)
                .map(FieldValue::kind)
                .unwrap_or(ValueKind::Text);
            let codec = overrides
                .remove(field)
                .unwrap_or_else(|| Codec::for_kind(kind));
            url_codecs.insert(field.clone(), codec);
        }

        let state = config.defaults.clone();
        let (tx, _rx) = watch::channel(state.clone());
        Ok(Self {
            config,
            url_codecs,
            navigator,
            store,
            state,
            initialized: false,
            tx,
        })
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn state(&self) -> StateObject {
        self.state.clone()
    }

    /// Subscribes to state changes.
    ///
    /// The receiver always observes whole states, never a half-applied batch.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<StateObject> {
        self.tx.subscribe()
    }

    /// Returns the navigator (tests inspect the mirrored query through it).
    #[must_use]
    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// True once `initialize` has run.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Returns the current value of a field.
    pub fn get(&self, field: &str) -> SyncResult<FieldValue> {
        self.state
            .get(field)
            .cloned()
            .ok_or_else(|| SyncError::UnknownField(field.to_string()))
    }

    /// Sets one field, mirroring to the URL (if the field is URL-mirrored)
    /// and to storage.
    pub fn set(&mut self, field: &str, value: impl Into<FieldValue>) -> SyncResult<()> {
        self.set_inner(field, value.into(), true)
    }

    /// Sets one field without touching the URL or storage.
    pub fn set_local(&mut self, field: &str, value: impl Into<FieldValue>) -> SyncResult<()> {
        self.set_inner(field, value.into(), false)
    }

    fn set_inner(&mut self, field: &str, value: FieldValue, mirror: bool) -> SyncResult<()> {
        let value = self.coerce(field, value)?;
        let url_mirrored = self.url_codecs.contains_key(field);
        self.state.insert(field, value);
        if mirror {
            if url_mirrored {
                self.rewrite_url();
            }
            self.persist();
        }
        self.notify();
        Ok(())
    }

    /// Applies a batch of updates atomically, with at most one URL rewrite
    /// and one change notification.
    ///
    /// Validation happens up front: if any field is unknown or wrong-typed,
    /// nothing is applied.
    pub fn set_multiple(&mut self, updates: StateObject) -> SyncResult<()> {
        self.set_multiple_inner(updates, true)
    }

    /// Applies a batch of updates without touching the URL or storage.
    pub fn set_multiple_local(&mut self, updates: StateObject) -> SyncResult<()> {
        self.set_multiple_inner(updates, false)
    }

    fn set_multiple_inner(&mut self, updates: StateObject, mirror: bool) -> SyncResult<()> {
        let mut coerced = Vec::with_capacity(updates.len());
        for (field, value) in updates.iter() {
            coerced.push((field.to_string(), self.coerce(field, value.clone())?));
        }
        for (field, value) in coerced {
            self.state.insert(field, value);
        }
        if mirror {
            self.rewrite_url();
            self.persist();
        }
        self.notify();
        Ok(())
    }

    /// Resolves the startup state from URL, storage, and defaults.
    ///
    /// Idempotent per instance: a second call returns the already-resolved
    /// state without re-running reconciliation.
    ///
    /// 1. Decode every URL-mirrored field present in the query.
    /// 2. Overlay those onto the defaults.
    /// 3. If the query did not carry *every* URL-mirrored field, consult the
    ///    persisted snapshot (absent, corrupt, or expired snapshots are
    ///    skipped).
    /// 4. On a surviving snapshot, merge with URL values winning on overlap
    ///    and rewrite the URL (as a history replace) to match.
    pub fn initialize(&mut self) -> SyncResult<StateObject> {
        if self.initialized {
            return Ok(self.state.clone());
        }

        let query = self.navigator.query();
        let mut url_state = StateObject::new();
        let mut complete = true;
        for field in &self.config.url_fields {
            let Some(raw) = query.get(field) else {
                complete = false;
                continue;
            };
            let (Some(default), Some(codec)) =
                (self.config.defaults.get(field), self.url_codecs.get(field))
            else {
                continue; // ruled out at construction
            };
            // A malformed value still counts as present; it just decodes
            // to the field default.
            let value = codec.decode(raw).unwrap_or_else(|| default.clone());
            url_state.insert(field.clone(), value);
        }

        self.state = self.config.defaults.overlaid(&url_state);
        self.initialized = true;

        if !complete {
            if let Some(stored) = self.restore_from_storage() {
                self.state = stored.overlaid(&url_state);
                self.rewrite_url();
            }
        }

        self.notify();
        Ok(self.state.clone())
    }

    /// Restores the state to the defaults, rewrites the URL accordingly,
    /// and removes the persisted snapshot.
    pub fn reset(&mut self) {
        self.state = self.config.defaults.clone();
        self.rewrite_url();
        if let (Some(key), Some(store)) = (self.config.storage_key.as_deref(), self.store.as_deref())
        {
            if let Err(e) = store.remove(key) {
                warn!(key, error = %e, "failed to remove persisted snapshot");
            }
        }
        self.notify();
    }

    /// Persists the current state, surfacing storage failures.
    ///
    /// No-op when storage is not configured.
    pub fn try_save_to_storage(&self) -> SyncResult<()> {
        let (Some(key), Some(store)) = (self.config.storage_key.as_deref(), self.store.as_deref())
        else {
            return Ok(());
        };
        let blob = Snapshot::new(self.state.clone()).to_blob()?;
        store.put(key, &blob)?;
        Ok(())
    }

    /// Persists the current state; failures are logged and swallowed.
    ///
    /// Storage is an accelerator, not a source of truth — a failed write
    /// must never block URL-based operation.
    pub fn save_to_storage(&self) {
        if let Err(e) = self.try_save_to_storage() {
            warn!(error = %e, "failed to persist snapshot");
        }
    }

    /// Reads the persisted snapshot, surfacing failures.
    ///
    /// `Ok(None)` means absent or expired; an expired snapshot is removed on
    /// detection. The returned state is conformed to the declared field set,
    /// so unknown keys and wrong-typed values never leak out of storage.
    pub fn try_restore_from_storage(&self) -> SyncResult<Option<StateObject>> {
        let (Some(key), Some(store)) = (self.config.storage_key.as_deref(), self.store.as_deref())
        else {
            return Ok(None);
        };
        let Some(blob) = store.get(key)? else {
            return Ok(None);
        };
        let snapshot = Snapshot::from_blob(&blob)
            .map_err(|e| SyncError::CorruptSnapshot(e.to_string()))?;
        if let Some(ttl) = self.config.storage_expiry {
            if snapshot.is_expired(now_millis(), ttl) {
                debug!(key, "discarding expired snapshot");
                if let Err(e) = store.remove(key) {
                    warn!(key, error = %e, "failed to remove expired snapshot");
                }
                return Ok(None);
            }
        }
        Ok(Some(snapshot.state.conform_to(&self.config.defaults)))
    }

    /// Reads the persisted snapshot; miss, expiry, and failure all yield
    /// `None`, leaving interpretation to the caller.
    #[must_use]
    pub fn restore_from_storage(&self) -> Option<StateObject> {
        match self.try_restore_from_storage() {
            Ok(restored) => restored,
            Err(e) => {
                warn!(error = %e, "failed to restore snapshot");
                None
            }
        }
    }

    /// Rewrites the query string from the entire current state.
    ///
    /// Foreign parameters are preserved in place; URL-mirrored fields whose
    /// encoding is empty are dropped so defaults never appear as `field=`.
    fn rewrite_url(&mut self) {
        let mut query = self.navigator.query();
        for field in &self.config.url_fields {
            let Some(value) = self.state.get(field) else {
                continue;
            };
            let Some(codec) = self.url_codecs.get(field) else {
                continue;
            };
            let raw = codec.encode(value);
            if raw.is_empty() {
                query.remove(field);
            } else {
                query.set(field.as_str(), raw);
            }
        }
        debug!(query = %query.encode(), "rewriting query string");
        self.navigator.replace_query(&query);
    }

    fn persist(&self) {
        self.save_to_storage();
    }

    fn notify(&self) {
        self.tx.send_replace(self.state.clone());
    }

    /// Checks a field update against the declared field set and kind.
    fn coerce(&self, field: &str, value: FieldValue) -> SyncResult<FieldValue> {
        let default = self
            .config
            .defaults
            .get(field)
            .ok_or_else(|| SyncError::UnknownField(field.to_string()))?;
        let expected = default.kind();
        let got = value.kind();
        value.into_kind(expected).ok_or(SyncError::WrongType {
            field: field.to_string(),
            expected,
            got,
        })
    }
}
