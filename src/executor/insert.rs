use log::debug;

use crate::{
    executor::{scan::RecordLocation, search::find_by_primary_key},
    storage::{page_store::PageStore, schema::TypeDefinition},
    types::{
        PageId,
        error::DatabaseError,
        page::Page,
        record::Record,
        value::{Value, is_alphanumeric_word},
    },
};

/// Trait for inserting records into a type
pub trait Inserter {
    /// Insert a single record, returning where it was placed
    fn insert(&mut self, record: Record) -> Result<RecordLocation, DatabaseError>;

    /// Insert records in order, stopping at the first failure
    fn insert_batch(&mut self, records: Vec<Record>) -> Result<Vec<RecordLocation>, DatabaseError>;

    /// Get the type name this inserter operates on
    fn type_name(&self) -> &str;
}

/// First-fit inserter over a bounded range of pages.
pub struct RecordInserter<'a> {
    page_store: &'a PageStore,
    schema: &'a TypeDefinition,
    max_pages: PageId,
}

impl<'a> RecordInserter<'a> {
    pub fn new(
        page_store: &'a PageStore,
        schema: &'a TypeDefinition,
        max_pages: PageId,
    ) -> Self {
        Self {
            page_store,
            schema,
            max_pages,
        }
    }

    /// Field count and per-kind format checks. Text values follow the same
    /// rule as names: alphanumeric with at least one letter.
    pub fn validate_record(&self, record: &Record) -> Result<(), DatabaseError> {
        if record.values.len() != self.schema.field_count() {
            return Err(DatabaseError::FieldCountMismatch {
                expected: self.schema.field_count(),
                actual: record.values.len(),
            });
        }

        for (field, value) in self.schema.fields.iter().zip(&record.values) {
            if field.kind != value.kind() {
                return Err(DatabaseError::InvalidValue {
                    field: field.name.clone(),
                    value: value.to_string(),
                    reason: format!("expected {}", field.kind),
                });
            }
            if let Value::Text(s) = value {
                if !is_alphanumeric_word(s) {
                    return Err(DatabaseError::InvalidValue {
                        field: field.name.clone(),
                        value: s.clone(),
                        reason: "text must be alphanumeric with at least one letter".to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn ensure_unique_key(&self, record: &Record) -> Result<(), DatabaseError> {
        let Some(key) = record.primary_key(self.schema) else {
            return Err(DatabaseError::FieldCountMismatch {
                expected: self.schema.field_count(),
                actual: record.values.len(),
            });
        };
        if find_by_primary_key(self.page_store, self.schema, key)?.is_some() {
            return Err(DatabaseError::DuplicatePrimaryKey {
                type_name: self.schema.name.clone(),
                key: key.to_string(),
            });
        }
        Ok(())
    }
}

impl Inserter for RecordInserter<'_> {
    fn insert(&mut self, record: Record) -> Result<RecordLocation, DatabaseError> {
        self.validate_record(&record)?;
        self.ensure_unique_key(&record)?;
        let bytes = record.to_bytes(self.schema)?;

        for page_id in 0..self.max_pages {
            let mut page = self
                .page_store
                .load_page(&self.schema.name, page_id)?
                .unwrap_or_else(|| Page::new(page_id));

            let Some(slot) = page.bitmap().first_free_slot(self.schema.slots_per_page) else {
                continue;
            };

            page.write_record(slot, self.schema.record_size, &bytes)?;
            self.page_store.save_page(&self.schema.name, page_id, &page)?;
            debug!(
                "inserted into '{}' at page {} slot {}",
                self.schema.name, page_id, slot
            );
            return Ok(RecordLocation { page_id, slot });
        }

        Err(DatabaseError::CapacityExhausted {
            type_name: self.schema.name.clone(),
            max_pages: self.max_pages,
        })
    }

    fn insert_batch(&mut self, records: Vec<Record>) -> Result<Vec<RecordLocation>, DatabaseError> {
        let mut locations = Vec::with_capacity(records.len());
        for record in records {
            locations.push(self.insert(record)?);
        }
        Ok(locations)
    }

    fn type_name(&self) -> &str {
        &self.schema.name
    }
}
