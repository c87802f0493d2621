//! Field kinds and tagged field values.
//!
//! Every component field holds one [`Value`]. The set of kinds is deliberately
//! tiny: it's what JSON can express without nesting, which is all a 2D game's
//! data files need.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The declared kind of a component field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[serde(alias = "integer")]
    Int,
    #[serde(alias = "number")]
    Float,
    #[serde(alias = "str")]
    String,
    #[serde(alias = "boolean")]
    Bool,
}

impl FieldKind {
    /// The value a field of this kind takes when the data doesn't supply one
    /// and the schema declares no default.
    pub fn zero(self) -> Value {
        match self {
            FieldKind::Int => Value::Int(0),
            FieldKind::Float => Value::Float(0.0),
            FieldKind::String => Value::Str(String::new()),
            FieldKind::Bool => Value::Bool(false),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Int => "int",
            FieldKind::Float => "float",
            FieldKind::String => "string",
            FieldKind::Bool => "bool",
        };
        f.write_str(name)
    }
}

/// A single field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

impl Value {
    pub fn kind(&self) -> FieldKind {
        match self {
            Value::Int(_) => FieldKind::Int,
            Value::Float(_) => FieldKind::Float,
            Value::Str(_) => FieldKind::String,
            Value::Bool(_) => FieldKind::Bool,
        }
    }

    /// Convert a JSON value into a field value of the given kind.
    ///
    /// Integers are accepted for float fields, and floats with no fractional
    /// part for int fields. Returns `None` on any other mismatch.
    pub fn from_json(kind: FieldKind, json: &serde_json::Value) -> Option<Value> {
        match kind {
            FieldKind::Int => {
                if let Some(i) = json.as_i64() {
                    return Some(Value::Int(i));
                }
                let f = json.as_f64()?;
                (f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64)
                    .then_some(Value::Int(f as i64))
            }
            FieldKind::Float => json.as_f64().map(Value::Float),
            FieldKind::String => json.as_str().map(|s| Value::Str(s.to_string())),
            FieldKind::Bool => json.as_bool().map(Value::Bool),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Value::from(*f),
            Value::Str(s) => serde_json::Value::from(s.as_str()),
            Value::Bool(b) => serde_json::Value::from(*b),
        }
    }

    /// Numeric view: ints widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}
