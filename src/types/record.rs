use serde::{Deserialize, Serialize};

use crate::{
    storage::schema::TypeDefinition,
    types::{
        INTEGER_FIELD_SIZE, RECORD_LIVE, RECORD_TOMBSTONE, VALIDITY_BYTE_SIZE,
        error::DatabaseError,
        value::{FieldKind, Value},
    },
};

/*
 * Record Layout (fixed width, driven entirely by the type definition)
 * ┌──────────┬──────────────────┬──────────────────┬─────┐
 * │ valid(1) │ field 0          │ field 1          │ ... │
 * │ 1 / 0    │ int: i32 LE (4)  │ str: text_width  │     │
 * └──────────┴──────────────────┴──────────────────┴─────┘
 * Text is left-justified and NUL-padded; no length prefix is stored.
 */

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub values: Vec<Value>,
}

impl Record {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn get_value(&self, field_index: usize) -> Option<&Value> {
        self.values.get(field_index)
    }

    pub fn primary_key(&self, schema: &TypeDefinition) -> Option<&Value> {
        self.values.get(schema.primary_key_index())
    }

    /// Encode into exactly `schema.record_size` bytes with the validity byte set.
    pub fn to_bytes(&self, schema: &TypeDefinition) -> Result<Vec<u8>, DatabaseError> {
        if self.values.len() != schema.field_count() {
            return Err(DatabaseError::FieldCountMismatch {
                expected: schema.field_count(),
                actual: self.values.len(),
            });
        }

        let mut buffer = Vec::with_capacity(schema.record_size);
        buffer.push(RECORD_LIVE);

        for (field, value) in schema.fields.iter().zip(&self.values) {
            match value {
                Value::Integer(i) if field.kind == value.kind() => {
                    buffer.extend_from_slice(&i.to_le_bytes());
                }
                Value::Text(s) if field.kind == value.kind() => {
                    let bytes = truncate_utf8(s, schema.text_width);
                    buffer.extend_from_slice(bytes);
                    buffer.resize(buffer.len() + schema.text_width - bytes.len(), 0);
                }
                _ => {
                    return Err(DatabaseError::InvalidValue {
                        field: field.name.clone(),
                        value: value.to_string(),
                        reason: format!("expected {}", field.kind),
                    });
                }
            }
        }

        debug_assert_eq!(buffer.len(), schema.record_size);
        Ok(buffer)
    }

    /// Decode one slot. `Ok(None)` means the slot holds a tombstone.
    pub fn from_bytes(schema: &TypeDefinition, bytes: &[u8]) -> Result<Option<Self>, DatabaseError> {
        if bytes.len() < schema.record_size {
            return Err(DatabaseError::SerializationError {
                details: format!(
                    "Record needs {} bytes, got {}",
                    schema.record_size,
                    bytes.len()
                ),
            });
        }

        if bytes.first().is_none_or(|&b| b == RECORD_TOMBSTONE) {
            return Ok(None);
        }

        let mut cursor = VALIDITY_BYTE_SIZE;
        let mut values = Vec::with_capacity(schema.field_count());
        for field in &schema.fields {
            let width = field.kind.encoded_size(schema.text_width);
            let raw = bytes
                .get(cursor..cursor + width)
                .ok_or_else(|| DatabaseError::SerializationError {
                    details: format!(
                        "Field '{}' at offset {} overruns a {}-byte record",
                        field.name,
                        cursor,
                        bytes.len()
                    ),
                })?;
            let value = match field.kind {
                FieldKind::Integer => {
                    let int_bytes: [u8; INTEGER_FIELD_SIZE] =
                        raw.try_into().map_err(|_| DatabaseError::SerializationError {
                            details: format!("Field '{}' is not {} bytes", field.name, width),
                        })?;
                    Value::Integer(i32::from_le_bytes(int_bytes))
                }
                FieldKind::Text => {
                    let end = raw.iter().rposition(|&b| b != 0).map_or(0, |p| p + 1);
                    Value::Text(String::from_utf8_lossy(&raw[..end]).into_owned())
                }
            };
            values.push(value);
            cursor += width;
        }

        Ok(Some(Record { values }))
    }
}

/// Longest prefix of `s` that fits in `max_bytes` without splitting a character.
fn truncate_utf8(s: &str, max_bytes: usize) -> &[u8] {
    if s.len() <= max_bytes {
        return s.as_bytes();
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s.as_bytes()[..end]
}
