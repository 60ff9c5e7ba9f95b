//! Scalar cell values

use std::fmt;

use serde::Serialize;

/// A single scalar value stored in a table cell.
///
/// Data read from delimited text always enters as [`Value::Text`] (or
/// [`Value::Null`] after sentinel substitution); the typed variants exist for
/// tables built programmatically.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing value (substituted for the configured null sentinel)
    Null,
    /// Native integer
    Integer(i64),
    /// Native floating-point number
    Float(f64),
    /// Text value
    Text(String),
}

impl Value {
    /// Whether this value is the null marker
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether this value counts as empty for empty-row removal.
    ///
    /// Null and the empty string are empty; every number is non-empty,
    /// including zero.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.is_empty(),
            Value::Integer(_) | Value::Float(_) => false,
        }
    }

    /// The text content, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}
