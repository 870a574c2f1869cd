//! Fixed-key state objects.
//!
//! A `StateObject` is the in-memory representation of one page's filter
//! state: an ordered mapping from field name to typed value. The key set is
//! decided once (by the defaults a synchronizer is configured with) and the
//! object is kept in that shape via [`StateObject::conform_to`] whenever data
//! arrives from an untrusted surface (URL, storage).

use crate::value::FieldValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An ordered mapping from field name to value.
///
/// Ordering is by field name, so serialized forms are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateObject {
    fields: BTreeMap<String, FieldValue>,
}

impl StateObject {
    /// Creates an empty state object.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Returns the value for a field, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Returns true if the field is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Inserts or replaces a field value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Removes a field, returning its value if it was present.
    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.remove(name)
    }

    /// Iterates over field names in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Iterates over `(name, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Overlays another state object onto this one.
    ///
    /// Every field in `other` overwrites the field of the same name here;
    /// fields only present in `self` are untouched. This is the merge
    /// primitive behind "URL wins over storage": overlay storage first, then
    /// overlay the URL-derived object on top.
    pub fn apply(&mut self, other: &Self) {
        for (name, value) in &other.fields {
            self.fields.insert(name.clone(), value.clone());
        }
    }

    /// Returns a copy of this object with `other` overlaid.
    #[must_use]
    pub fn overlaid(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        merged.apply(other);
        merged
    }

    /// Conforms this object to the shape of `defaults`.
    ///
    /// - Fields not declared in `defaults` are dropped.
    /// - Fields missing here take the default value.
    /// - Fields whose value cannot be read as the default's kind fall back
    ///   to the default, so one bad field never spoils the rest.
    #[must_use]
    pub fn conform_to(mut self, defaults: &Self) -> Self {
        let mut conformed = BTreeMap::new();
        for (name, default) in &defaults.fields {
            let value = self
                .fields
                .remove(name)
                .and_then(|v| v.into_kind(default.kind()))
                .unwrap_or_else(|| default.clone());
            conformed.insert(name.clone(), value);
        }
        Self { fields: conformed }
    }
}

impl FromIterator<(String, FieldValue)> for StateObject {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
