use std::fs;

use log::info;

use crate::{
    config::ArchiveConfig,
    executor::{
        delete::RecordDeleter,
        insert::{Inserter, RecordInserter},
        scan::{LocatedRecord, RecordLocation, Scanner},
        search::find_by_primary_key,
        sequential_scan::SequentialScanner,
    },
    storage::{
        catalog::Catalog,
        page_store::PageStore,
        schema::{FieldSchema, TypeDefinition},
    },
    types::{PageId, error::DatabaseError, record::Record, value::Value},
};

/// Owns the catalog and page store for one data directory. Every operation
/// runs synchronously to completion; there is no shared state between calls
/// beyond what is on disk and in the catalog.
pub struct StorageManager {
    config: ArchiveConfig,
    catalog: Catalog,
    page_store: PageStore,
}

impl StorageManager {
    pub fn open(config: ArchiveConfig) -> Result<Self, DatabaseError> {
        config.validate()?;
        fs::create_dir_all(&config.data_dir)?;
        let catalog = Catalog::load(config.catalog_path());
        let page_store = PageStore::new(&config.data_dir);
        info!(
            "opened archive at {} with {} type(s)",
            config.data_dir.display(),
            catalog.len()
        );
        Ok(Self {
            config,
            catalog,
            page_store,
        })
    }

    /// Release the store. All writes are already on disk.
    pub fn close(self) {
        info!("closed archive at {}", self.config.data_dir.display());
    }

    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn page_store(&self) -> &PageStore {
        &self.page_store
    }

    fn schema(&self, type_name: &str) -> Result<&TypeDefinition, DatabaseError> {
        self.catalog
            .lookup(type_name)
            .ok_or_else(|| DatabaseError::TypeNotFound {
                name: type_name.to_string(),
            })
    }

    pub fn create_type(
        &mut self,
        type_name: &str,
        fields: Vec<FieldSchema>,
        primary_key_order: usize,
    ) -> Result<&TypeDefinition, DatabaseError> {
        if self.catalog.contains(type_name) {
            return Err(DatabaseError::TypeAlreadyExists {
                name: type_name.to_string(),
            });
        }
        let definition =
            TypeDefinition::new(type_name.to_string(), fields, primary_key_order, &self.config)?;
        self.catalog.define_type(definition, &self.page_store)
    }

    pub fn create_record(
        &mut self,
        type_name: &str,
        values: Vec<Value>,
    ) -> Result<RecordLocation, DatabaseError> {
        let schema = self.schema(type_name)?;
        let mut inserter = RecordInserter::new(
            &self.page_store,
            schema,
            self.config.max_pages_per_type,
        );
        inserter.insert(Record::new(values))
    }

    /// Locate the live record with primary key `key`, if any.
    pub fn find_record(
        &self,
        type_name: &str,
        key: &Value,
    ) -> Result<Option<LocatedRecord>, DatabaseError> {
        let schema = self.schema(type_name)?;
        find_by_primary_key(&self.page_store, schema, key)
    }

    pub fn search_record(&self, type_name: &str, key: &Value) -> Result<Record, DatabaseError> {
        self.find_record(type_name, key)?
            .map(|located| located.record)
            .ok_or_else(|| DatabaseError::RecordNotFound {
                type_name: type_name.to_string(),
                key: key.to_string(),
            })
    }

    pub fn delete_record(
        &mut self,
        type_name: &str,
        key: &Value,
    ) -> Result<RecordLocation, DatabaseError> {
        let schema = self.schema(type_name)?;
        RecordDeleter::new(&self.page_store, schema).delete(key)
    }

    pub fn create_scanner(&self, type_name: &str) -> Result<SequentialScanner<'_>, DatabaseError> {
        let schema = self.schema(type_name)?;
        SequentialScanner::new(&self.page_store, schema)
    }

    /// All live records of a type in page/slot order.
    pub fn scan_type(&self, type_name: &str) -> Result<Vec<Record>, DatabaseError> {
        let mut scanner = self.create_scanner(type_name)?;
        let mut records = Vec::new();
        while let Some(located) = scanner.scan()? {
            records.push(located.record);
        }
        Ok(records)
    }

    pub fn get_type(&self, type_name: &str) -> Option<&TypeDefinition> {
        self.catalog.lookup(type_name)
    }

    pub fn type_exists(&self, type_name: &str) -> bool {
        self.catalog.contains(type_name)
    }

    pub fn type_names(&self) -> Vec<String> {
        self.catalog.type_names().iter().map(|s| s.to_string()).collect()
    }

    pub fn page_count(&self, type_name: &str) -> Result<PageId, DatabaseError> {
        self.schema(type_name)?;
        self.page_store.page_count(type_name)
    }
}
