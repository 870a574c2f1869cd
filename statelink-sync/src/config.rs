//! Synchronizer configuration.

use crate::codec::Codec;
use statelink_types::StateObject;
use std::collections::HashMap;
use std::time::Duration;

/// Configuration for a [`Synchronizer`](crate::Synchronizer).
///
/// Supplied once at construction and immutable for the synchronizer's
/// lifetime. The defaults define the full field set; everything else narrows
/// behavior per field.
#[derive(Debug, Default)]
pub struct SyncConfig {
    /// Default value per field; also fixes each field's kind and the key set.
    pub defaults: StateObject,
    /// Fields mirrored to the query string.
    pub url_fields: Vec<String>,
    /// Per-field codec overrides. Absent fields use the built-in codec for
    /// their default value's kind.
    pub codecs: HashMap<String, Codec>,
    /// Persisted-storage key. `None` disables storage mirroring entirely.
    pub storage_key: Option<String>,
    /// Age after which a persisted snapshot is discarded on read.
    pub storage_expiry: Option<Duration>,
}

impl SyncConfig {
    /// Creates a configuration with the given defaults and nothing mirrored.
    #[must_use]
    pub fn new(defaults: StateObject) -> Self {
        Self {
            defaults,
            ..Self::default()
        }
    }

    /// Declares one field as URL-mirrored.
    #[must_use]
    pub fn url_field(mut self, field: impl Into<String>) -> Self {
        self.url_fields.push(field.into());
        self
    }

    /// Declares several fields as URL-mirrored.
    #[must_use]
    pub fn url_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.url_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Overrides the codec for one field.
    #[must_use]
    pub fn codec(mut self, field: impl Into<String>, codec: Codec) -> Self {
        self.codecs.insert(field.into(), codec);
        self
    }

    /// Enables storage mirroring under the given key.
    #[must_use]
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = Some(key.into());
        self
    }

    /// Sets the snapshot expiry.
    #[must_use]
    pub fn storage_expiry(mut self, ttl: Duration) -> Self {
        self.storage_expiry = Some(ttl);
        self
    }
}
