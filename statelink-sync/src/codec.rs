//! Per-field value transformers.
//!
//! Every URL-mirrored field needs a way to and from its query-parameter
//! string. The built-in codecs cover the four value kinds; a field can
//! override them with a [`FieldCodec`] implementation of its own. The
//! built-in for a field is picked from its default value's kind, so there is
//! no field without a defined transformation.
//!
//! Decoding is total over failure: `None` means "fall back to this field's
//! default", never an abort of the surrounding restore.

use statelink_types::{FieldValue, ValueKind};
use std::fmt;

/// A custom transformer for one field.
pub trait FieldCodec: Send + Sync {
    /// Serializes a value to its query-parameter form.
    ///
    /// Returning the empty string omits the field from the URL entirely.
    fn encode(&self, value: &FieldValue) -> String;

    /// Parses a query-parameter value. `None` falls back to the field default.
    fn decode(&self, raw: &str) -> Option<FieldValue>;
}

/// The transformer used for one field.
pub enum Codec {
    /// Booleans as `"1"`/`"0"`; `"1"` and `"true"` decode to true.
    Bool,
    /// Numbers as shortest round-trip decimal text.
    Number,
    /// Strings verbatim.
    Text,
    /// Composite values as JSON text; JSON null encodes to the empty string.
    Json,
    /// Caller-supplied transformer.
    Custom(Box<dyn FieldCodec>),
}

impl Codec {
    /// Returns the built-in codec for a value kind.
    #[must_use]
    pub fn for_kind(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Bool => Self::Bool,
            ValueKind::Number => Self::Number,
            ValueKind::Text => Self::Text,
            ValueKind::Json => Self::Json,
        }
    }

    /// Wraps a caller-supplied transformer.
    #[must_use]
    pub fn custom(codec: impl FieldCodec + 'static) -> Self {
        Self::Custom(Box::new(codec))
    }

    /// Serializes `value` to its query-parameter form.
    ///
    /// A value of an unexpected kind falls through to its JSON text, so
    /// encoding is total even if a caller bypassed the kind check.
    #[must_use]
    pub fn encode(&self, value: &FieldValue) -> String {
        match (self, value) {
            (Self::Custom(codec), _) => codec.encode(value),
            (Self::Bool, FieldValue::Bool(b)) => (if *b { "1" } else { "0" }).to_string(),
            (Self::Number, FieldValue::Number(n)) => n.to_string(),
            (Self::Text, FieldValue::Text(s)) => s.clone(),
            (Self::Json, FieldValue::Json(serde_json::Value::Null)) => String::new(),
            (Self::Json, FieldValue::Json(v)) => {
                serde_json::to_string(v).unwrap_or_default()
            }
            (_, other) => serde_json::to_string(&other.clone().into_json()).unwrap_or_default(),
        }
    }

    /// Parses a query-parameter value. `None` falls back to the field default.
    #[must_use]
    pub fn decode(&self, raw: &str) -> Option<FieldValue> {
        match self {
            Self::Custom(codec) => codec.decode(raw),
            Self::Bool => Some(FieldValue::Bool(raw == "1" || raw == "true")),
            Self::Number => raw
                .parse::<f64>()
                .ok()
                .filter(|n| !n.is_nan())
                .map(FieldValue::Number),
            Self::Text => Some(FieldValue::Text(raw.to_string())),
            Self::Json => serde_json::from_str(raw).ok().map(FieldValue::Json),
        }
    }
}

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "Bool",
            Self::Number => "Number",
            Self::Text => "Text",
            Self::Json => "Json",
            Self::Custom(_) => "Custom",
        };
        write!(f, "Codec::{name}")
    }
}
