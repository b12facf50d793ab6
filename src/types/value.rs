use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{INTEGER_FIELD_SIZE, error::DatabaseError};

/// The declared kind of a field. Serialized as the protocol keyword (`int` / `str`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    #[serde(rename = "int")]
    Integer,
    #[serde(rename = "str")]
    Text,
}

impl FieldKind {
    pub fn from_string(kind: &str) -> Result<Self, DatabaseError> {
        match kind {
            "int" => Ok(FieldKind::Integer),
            "str" => Ok(FieldKind::Text),
            other => Err(DatabaseError::UnknownFieldKind {
                kind: other.to_string(),
            }),
        }
    }

    /// Encoded width of a field of this kind.
    pub fn encoded_size(&self, max_text_length: usize) -> usize {
        match self {
            FieldKind::Integer => INTEGER_FIELD_SIZE,
            FieldKind::Text => max_text_length,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Integer => write!(f, "int"),
            FieldKind::Text => write!(f, "str"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    Integer(i32),
    Text(String),
}

impl Value {
    pub fn kind(&self) -> FieldKind {
        match self {
            Value::Integer(_) => FieldKind::Integer,
            Value::Text(_) => FieldKind::Text,
        }
    }

    /// Parse a protocol token as a value of `kind`.
    pub fn from_string(token: &str, kind: FieldKind) -> Result<Self, DatabaseError> {
        match kind {
            FieldKind::Integer => token
                .parse::<i32>()
                .map(Value::Integer)
                .map_err(|e| DatabaseError::InvalidValue {
                    field: kind.to_string(),
                    value: token.to_string(),
                    reason: e.to_string(),
                }),
            FieldKind::Text => Ok(Value::Text(token.to_string())),
        }
    }

    /// Best-effort conversion of a lookup key: an Integer when `kind` is Integer
    /// and the token parses, Text otherwise.
    pub fn coerce_key(token: &str, kind: FieldKind) -> Self {
        match kind {
            FieldKind::Integer => token
                .parse::<i32>()
                .map(Value::Integer)
                .unwrap_or_else(|_| Value::Text(token.to_string())),
            FieldKind::Text => Value::Text(token.to_string()),
        }
    }

    /// Primary-key equality. Values of the same variant compare natively;
    /// mixed variants compare their trimmed string renderings, so `Integer(7)`
    /// matches `Text("7")` but not `Text("007")`.
    pub fn key_matches(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => self.to_string().trim() == other.to_string().trim(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

/// Naming rule shared by type names, field names and text values:
/// non-empty, alphanumeric only, at least one letter.
pub fn is_alphanumeric_word(s: &str) -> bool {
    !s.is_empty()
        && s.chars().all(char::is_alphanumeric)
        && s.chars().any(char::is_alphabetic)
}
