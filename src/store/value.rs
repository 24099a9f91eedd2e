//! Typed values held by a snapshot store

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a [`StoreValue`], used for typed reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    Int,
    Float,
    Bool,
    Bytes,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::String => "string",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Bool => "bool",
            ValueKind::Bytes => "bytes",
        };
        f.write_str(name)
    }
}

/// A single value in a snapshot store
///
/// Serializes as the bare value. Deserializing tries the variants in
/// declaration order, so an integer never reads back as a float and a byte
/// blob is an array of small integers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoreValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Bytes(Vec<u8>),
}

impl StoreValue {
    /// Kind of this value
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            StoreValue::String(_) => ValueKind::String,
            StoreValue::Int(_) => ValueKind::Int,
            StoreValue::Float(_) => ValueKind::Float,
            StoreValue::Bool(_) => ValueKind::Bool,
            StoreValue::Bytes(_) => ValueKind::Bytes,
        }
    }

    /// Convert to `kind`, accepting the lossless conversions a text-based
    /// store needs (numbers and booleans written by another tool as strings,
    /// integral floats read as ints, and so on).
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the value cannot represent `kind`.
    pub fn coerce(self, key: &str, kind: ValueKind) -> Result<StoreValue> {
        if self.kind() == kind {
            return Ok(self);
        }

        let mismatch = |value: &StoreValue| Error::TypeMismatch {
            key: key.to_string(),
            expected: kind.to_string(),
            actual: value.kind().to_string(),
        };

        let converted = match (&self, kind) {
            (StoreValue::Int(n), ValueKind::Float) => Some(StoreValue::Float(*n as f64)),
            (StoreValue::Int(n), ValueKind::Bool) => Some(StoreValue::Bool(*n != 0)),
            (StoreValue::Float(x), ValueKind::Int)
                if x.fract() == 0.0 && *x >= i64::MIN as f64 && *x <= i64::MAX as f64 =>
            {
                Some(StoreValue::Int(*x as i64))
            }
            (StoreValue::Bool(b), ValueKind::Int) => Some(StoreValue::Int(i64::from(*b))),
            (StoreValue::String(s), ValueKind::Int) => s.trim().parse().ok().map(StoreValue::Int),
            (StoreValue::String(s), ValueKind::Float) => {
                s.trim().parse().ok().map(StoreValue::Float)
            }
            (StoreValue::String(s), ValueKind::Bool) => match s.trim() {
                "true" | "1" => Some(StoreValue::Bool(true)),
                "false" | "0" => Some(StoreValue::Bool(false)),
                _ => None,
            },
            (StoreValue::String(s), ValueKind::Bytes) => {
                Some(StoreValue::Bytes(s.as_bytes().to_vec()))
            }
            (StoreValue::Int(_) | StoreValue::Float(_) | StoreValue::Bool(_), ValueKind::String) => {
                Some(StoreValue::String(self.to_string()))
            }
            (StoreValue::Bytes(bytes), ValueKind::String) => {
                String::from_utf8(bytes.clone()).ok().map(StoreValue::String)
            }
            _ => None,
        };

        converted.ok_or_else(|| mismatch(&self))
    }

    /// Borrow as a string slice, if this is a string
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            StoreValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for StoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreValue::String(s) => f.write_str(s),
            StoreValue::Int(n) => write!(f, "{n}"),
            StoreValue::Float(x) => write!(f, "{x:?}"),
            StoreValue::Bool(b) => write!(f, "{b}"),
            StoreValue::Bytes(bytes) => write!(f, "<{} bytes>", bytes.len()),
        }
    }
}

impl From<String> for StoreValue {
    fn from(value: String) -> Self {
        StoreValue::String(value)
    }
}

impl From<&str> for StoreValue {
    fn from(value: &str) -> Self {
        StoreValue::String(value.to_string())
    }
}

impl From<i64> for StoreValue {
    fn from(value: i64) -> Self {
        StoreValue::Int(value)
    }
}

impl From<f64> for StoreValue {
    fn from(value: f64) -> Self {
        StoreValue::Float(value)
    }
}

impl From<bool> for StoreValue {
    fn from(value: bool) -> Self {
        StoreValue::Bool(value)
    }
}

impl From<Vec<u8>> for StoreValue {
    fn from(value: Vec<u8>) -> Self {
        StoreValue::Bytes(value)
    }
}
