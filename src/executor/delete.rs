use log::debug;

use crate::{
    executor::{scan::RecordLocation, search::find_by_primary_key},
    storage::{page_store::PageStore, schema::TypeDefinition},
    types::{error::DatabaseError, value::Value},
};

/// Tombstones the record matching a primary key. The page is rewritten in
/// place; nothing is compacted and the file never shrinks.
pub struct RecordDeleter<'a> {
    page_store: &'a PageStore,
    schema: &'a TypeDefinition,
}

impl<'a> RecordDeleter<'a> {
    pub fn new(page_store: &'a PageStore, schema: &'a TypeDefinition) -> Self {
        Self { page_store, schema }
    }

    pub fn delete(&mut self, key: &Value) -> Result<RecordLocation, DatabaseError> {
        let located = find_by_primary_key(self.page_store, self.schema, key)?
            .ok_or_else(|| DatabaseError::RecordNotFound {
                type_name: self.schema.name.clone(),
                key: key.to_string(),
            })?;
        let RecordLocation { page_id, slot } = located.location;

        let mut page = self
            .page_store
            .load_page(&self.schema.name, page_id)?
            .ok_or_else(|| DatabaseError::RecordNotFound {
                type_name: self.schema.name.clone(),
                key: key.to_string(),
            })?;
        page.tombstone(slot, self.schema.record_size)?;
        self.page_store.save_page(&self.schema.name, page_id, &page)?;

        debug!(
            "deleted '{}' key {} at page {} slot {}",
            self.schema.name, key, page_id, slot
        );
        Ok(located.location)
    }
}
