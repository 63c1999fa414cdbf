//! Typed setting values and kind-driven coercion
//!
//! Every configuration key carries a [`SettingKind`] fixed at creation. The
//! kind decides which field adapter renders the entry, how raw text from the
//! server is coerced, and which writes pass the store's type guard.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Value type of a configuration key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettingKind {
    #[serde(rename = "boolean")]
    Bool,
    #[serde(rename = "signed-integer")]
    Int,
    #[serde(rename = "unsigned-integer")]
    Uint,
    #[serde(rename = "string")]
    Text,
}

impl SettingKind {
    /// The zero value for this kind.
    pub fn default_value(&self) -> SettingValue {
        match self {
            SettingKind::Bool => SettingValue::Bool(false),
            SettingKind::Int => SettingValue::Int(0),
            SettingKind::Uint => SettingValue::Uint(0),
            SettingKind::Text => SettingValue::Text(String::new()),
        }
    }

    /// Coerce an unparsed text response from the server into a typed value.
    ///
    /// - `Bool`: exactly `"true"` (after trimming) maps to `true`, anything
    ///   else to `false`
    /// - `Int` / `Uint`: decimal parse; unparseable input falls back to `0`
    ///   with a logged warning
    /// - `Text`: passed through unchanged
    pub fn coerce_raw(&self, id: &str, raw: &str) -> SettingValue {
        match self {
            SettingKind::Bool => SettingValue::Bool(raw.trim() == "true"),
            SettingKind::Int => match raw.trim().parse::<i64>() {
                Ok(v) => SettingValue::Int(v),
                Err(_) => {
                    warn!(setting = %id, raw = %raw, "unparseable integer from server, falling back to 0");
                    SettingValue::Int(0)
                }
            },
            SettingKind::Uint => match raw.trim().parse::<u64>() {
                Ok(v) => SettingValue::Uint(v),
                Err(_) => {
                    warn!(setting = %id, raw = %raw, "unparseable unsigned integer from server, falling back to 0");
                    SettingValue::Uint(0)
                }
            },
            SettingKind::Text => SettingValue::Text(raw.to_string()),
        }
    }
}

/// A typed setting value
///
/// Serializes untagged, i.e. as the bare JSON primitive, which is what the
/// server's write endpoint expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Text(String),
}

impl SettingValue {
    /// The kind this value belongs to.
    pub fn kind(&self) -> SettingKind {
        match self {
            SettingValue::Bool(_) => SettingKind::Bool,
            SettingValue::Int(_) => SettingKind::Int,
            SettingValue::Uint(_) => SettingKind::Uint,
            SettingValue::Text(_) => SettingKind::Text,
        }
    }

    /// Typed extraction from a wire JSON value, used when decoding bulk
    /// listings. Returns `None` when the JSON doesn't fit the kind.
    pub fn from_wire(kind: SettingKind, value: &serde_json::Value) -> Option<SettingValue> {
        match kind {
            SettingKind::Bool => value.as_bool().map(SettingValue::Bool),
            SettingKind::Int => value.as_i64().map(SettingValue::Int),
            SettingKind::Uint => value.as_u64().map(SettingValue::Uint),
            SettingKind::Text => value.as_str().map(|s| SettingValue::Text(s.to_string())),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SettingValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            SettingValue::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(v) => write!(f, "{}", v),
            SettingValue::Int(v) => write!(f, "{}", v),
            SettingValue::Uint(v) => write!(f, "{}", v),
            SettingValue::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(v: bool) -> Self {
        SettingValue::Bool(v)
    }
}

impl From<i64> for SettingValue {
    fn from(v: i64) -> Self {
        SettingValue::Int(v)
    }
}

impl From<u64> for SettingValue {
    fn from(v: u64) -> Self {
        SettingValue::Uint(v)
    }
}

impl From<&str> for SettingValue {
    fn from(v: &str) -> Self {
        SettingValue::Text(v.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(v: String) -> Self {
        SettingValue::Text(v)
    }
}
