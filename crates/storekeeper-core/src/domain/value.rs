//! Dynamically-typed configuration values.
//!
//! Every node of a configuration tree is a [`Value`].  Leaves are scalars
//! (null, boolean, integer, float, string) and inner nodes are [`Map`]s of
//! further values.
//!
//! # Why an `IndexMap`?
//!
//! Configuration files are edited by humans.  When Storekeeper writes a file
//! back to disk the keys must come out in the order they went in, otherwise
//! every save would shuffle the file.  `IndexMap` keeps insertion order while
//! still giving hash-map lookups.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An insertion-ordered mapping from string keys to values.
pub type Map = IndexMap<String, Value>;

/// A single configuration value.
///
/// Serialized untagged, so a `Value` maps one-to-one onto plain JSON (minus
/// arrays, which are not part of the model).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Map(Map),
}

impl Value {
    /// Returns an empty mapping value.
    pub fn empty_map() -> Self {
        Value::Map(Map::new())
    }

    /// Human-readable name of the variant, used in log lines and error text.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Map(_) => "map",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a float.  Integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the inner mapping, first replacing a non-mapping value with an
    /// empty mapping.
    ///
    /// This is the "overwrite on conflict" rule used when a write walks
    /// through an intermediate node that is a scalar.
    pub fn make_map(&mut self) -> &mut Map {
        if !self.is_map() {
            *self = Value::empty_map();
        }
        match self {
            Value::Map(m) => m,
            _ => unreachable!("value was replaced by a map above"),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl fmt::Display for Value {
    /// Formats scalars plainly (strings without quotes) and mappings as
    /// `{key: value, ...}`.  Intended for terminal output, not persistence.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => f.write_str(s),
            Value::Map(m) => {
                f.write_str("{")?;
                for (i, (key, value)) in m.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

// ── Conversions ───────────────────────────────────────────────────────────────

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Value::Map(m)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
