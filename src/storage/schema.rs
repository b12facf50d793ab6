use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
    config::ArchiveConfig,
    storage::slot_allocator::slot_capacity,
    types::{
        BITMAP_SIZE, MAX_BITMAP_SLOTS, PAGE_SIZE, VALIDITY_BYTE_SIZE,
        error::DatabaseError,
        value::{FieldKind, is_alphanumeric_word},
    },
};

/// One declared field of a type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Immutable schema of a type, as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDefinition {
    pub name: String,
    pub fields: Vec<FieldSchema>,
    /// 1-based position of the primary-key field.
    pub primary_key_order: usize,
    /// Width of every Text field, fixed when the type is created.
    pub text_width: usize,
    pub record_size: usize,
    /// Usable slots per page, fixed when the type is created.
    pub slots_per_page: usize,
    pub next_page_id: u64,
}

fn check_fields(
    fields: &[FieldSchema],
    primary_key_order: usize,
    max_field_name_length: usize,
) -> Result<(), DatabaseError> {
    if primary_key_order < 1 || primary_key_order > fields.len() {
        return Err(DatabaseError::PrimaryKeyOutOfRange {
            order: primary_key_order,
            field_count: fields.len(),
        });
    }

    let mut seen = HashSet::new();
    for field in fields {
        if field.name.chars().count() > max_field_name_length || !is_alphanumeric_word(&field.name)
        {
            return Err(DatabaseError::InvalidName {
                what: "field",
                name: field.name.clone(),
            });
        }
        if !seen.insert(field.name.as_str()) {
            return Err(DatabaseError::DuplicateFieldName {
                name: field.name.clone(),
            });
        }
    }
    Ok(())
}

impl TypeDefinition {
    /// Validate a type declaration against the configured limits and build
    /// its definition. Text width and slots per page are fixed here and
    /// never follow later config changes.
    pub fn new(
        name: String,
        fields: Vec<FieldSchema>,
        primary_key_order: usize,
        config: &ArchiveConfig,
    ) -> Result<Self, DatabaseError> {
        if name.chars().count() > config.max_type_name_length || !is_alphanumeric_word(&name) {
            return Err(DatabaseError::InvalidName { what: "type", name });
        }

        if fields.len() > config.max_fields_per_type {
            return Err(DatabaseError::TooManyFields {
                name,
                count: fields.len(),
                max: config.max_fields_per_type,
            });
        }

        check_fields(&fields, primary_key_order, config.max_field_name_length)?;

        let record_size = Self::calculate_record_size(&fields, config.max_text_length);
        let slots_per_page = slot_capacity(record_size, config.max_records_per_page);
        if slots_per_page == 0 {
            return Err(DatabaseError::RecordTooLarge {
                record_size,
                available: PAGE_SIZE - BITMAP_SIZE,
            });
        }

        Ok(Self {
            name,
            fields,
            primary_key_order,
            text_width: config.max_text_length,
            record_size,
            slots_per_page,
            next_page_id: 0,
        })
    }

    /// Structural checks for a definition read back from the catalog file.
    /// Length limits are not re-applied; they may have changed after the
    /// type was created.
    pub fn check_consistency(&self) -> Result<(), DatabaseError> {
        let inconsistent = |details: String| DatabaseError::InconsistentDefinition {
            name: self.name.clone(),
            details,
        };

        if !is_alphanumeric_word(&self.name) {
            return Err(DatabaseError::InvalidName {
                what: "type",
                name: self.name.clone(),
            });
        }
        check_fields(&self.fields, self.primary_key_order, usize::MAX)?;

        let expected = Self::calculate_record_size(&self.fields, self.text_width);
        if self.record_size != expected {
            return Err(inconsistent(format!(
                "record_size is {} but the fields need {}",
                self.record_size, expected
            )));
        }

        let max_slots = slot_capacity(self.record_size, MAX_BITMAP_SLOTS);
        if self.slots_per_page == 0 || self.slots_per_page > max_slots {
            return Err(inconsistent(format!(
                "slots_per_page {} outside 1..={}",
                self.slots_per_page, max_slots
            )));
        }
        Ok(())
    }

    pub fn calculate_record_size(fields: &[FieldSchema], text_width: usize) -> usize {
        fields.iter().fold(VALIDITY_BYTE_SIZE, |size, f| {
            size.saturating_add(f.kind.encoded_size(text_width))
        })
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn primary_key_index(&self) -> usize {
        self.primary_key_order.saturating_sub(1)
    }

    pub fn primary_key_field(&self) -> Option<&FieldSchema> {
        self.fields.get(self.primary_key_index())
    }
}

/// Builder for type declarations
pub struct TypeDefinitionBuilder {
    name: String,
    fields: Vec<FieldSchema>,
    primary_key_order: usize,
}

impl TypeDefinitionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            primary_key_order: 1,
        }
    }

    pub fn add_field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldSchema::new(name, kind));
        self
    }

    pub fn primary_key(mut self, order: usize) -> Self {
        self.primary_key_order = order;
        self
    }

    pub fn build(self, config: &ArchiveConfig) -> Result<TypeDefinition, DatabaseError> {
        TypeDefinition::new(self.name, self.fields, self.primary_key_order, config)
    }
}
