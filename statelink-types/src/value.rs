//! Field value tagged union.
//!
//! A state object maps field names to `FieldValue`s. The variant of a field
//! is fixed by its declared default: a field whose default is `Bool` stays
//! `Bool` for the lifetime of the state object. Everything that cannot be
//! expressed as a boolean, number, or string is carried as raw JSON.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single typed field value.
///
/// Serialized untagged, so snapshots read as natural JSON
/// (`{"page": 3, "solo": true}`), not as enum wrappers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Boolean flag.
    Bool(bool),
    /// Numeric value.
    Number(f64),
    /// Plain string.
    Text(String),
    /// Composite value carried as JSON.
    Json(serde_json::Value),
}

impl FieldValue {
    /// Returns the kind tag for this value.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Number(_) => ValueKind::Number,
            Self::Text(_) => ValueKind::Text,
            Self::Json(_) => ValueKind::Json,
        }
    }

    /// Reinterprets this value as `kind`, if the underlying data allows it.
    ///
    /// Untagged deserialization loses the declared variant: a persisted
    /// `Json(Value::String(..))` comes back as `Text`, and every number comes
    /// back as `Number`. Conversion against the declared kind restores the
    /// intended variant; `None` means the data genuinely does not fit.
    #[must_use]
    pub fn into_kind(self, kind: ValueKind) -> Option<Self> {
        if self.kind() == kind {
            return Some(self);
        }
        match kind {
            ValueKind::Json => Some(Self::Json(self.into_json())),
            ValueKind::Bool => match self {
                Self::Json(serde_json::Value::Bool(b)) => Some(Self::Bool(b)),
                _ => None,
            },
            ValueKind::Number => match self {
                Self::Json(serde_json::Value::Number(n)) => n.as_f64().map(Self::Number),
                _ => None,
            },
            ValueKind::Text => match self {
                Self::Json(serde_json::Value::String(s)) => Some(Self::Text(s)),
                _ => None,
            },
        }
    }

    /// Converts this value into its JSON representation.
    #[must_use]
    pub fn into_json(self) -> serde_json::Value {
        match self {
            Self::Bool(b) => serde_json::Value::Bool(b),
            Self::Number(n) => serde_json::Number::from_f64(n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::Text(s) => serde_json::Value::String(s),
            Self::Json(v) => v,
        }
    }

    /// Returns the boolean if this is a `Bool`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the number if this is a `Number`.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string if this is a `Text`.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the JSON value if this is a `Json`.
    #[must_use]
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(v: serde_json::Value) -> Self {
        Self::Json(v)
    }
}

/// The kind of a [`FieldValue`], used for type checks and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Bool,
    Number,
    Text,
    Json,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Number => "number",
            Self::Text => "text",
            Self::Json => "json",
        };
        write!(f, "{name}")
    }
}
