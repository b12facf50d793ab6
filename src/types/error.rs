use thiserror::Error;

use crate::types::PageId;

/// Coarse failure classes used when reporting outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Capacity,
    Io,
    NotFound,
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid {what} name '{name}'")]
    InvalidName { what: &'static str, name: String },

    #[error("Type '{name}' declares {count} fields (max: {max})")]
    TooManyFields {
        name: String,
        count: usize,
        max: usize,
    },

    #[error("Unknown field kind '{kind}'")]
    UnknownFieldKind { kind: String },

    #[error("Primary key order {order} out of range 1..={field_count}")]
    PrimaryKeyOutOfRange { order: usize, field_count: usize },

    #[error("Duplicate field name '{name}'")]
    DuplicateFieldName { name: String },

    #[error("Record of {record_size} bytes does not fit a page ({available} bytes available)")]
    RecordTooLarge {
        record_size: usize,
        available: usize,
    },

    #[error("Type '{name}' already exists")]
    TypeAlreadyExists { name: String },

    #[error("Type '{name}' not found")]
    TypeNotFound { name: String },

    #[error("Expected {expected} values, got {actual}")]
    FieldCountMismatch { expected: usize, actual: usize },

    #[error("Invalid value '{value}' for field '{field}': {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Duplicate primary key '{key}' in type '{type_name}'")]
    DuplicatePrimaryKey { type_name: String, key: String },

    #[error("No free slot in the first {max_pages} pages of type '{type_name}'")]
    CapacityExhausted { type_name: String, max_pages: u64 },

    #[error("No record with primary key '{key}' in type '{type_name}'")]
    RecordNotFound { type_name: String, key: String },

    #[error("Malformed command: {details}")]
    MalformedCommand { details: String },

    #[error("Invalid page size: {expected} bytes, got {actual} bytes")]
    InvalidPageSize { expected: usize, actual: usize },

    #[error("Invalid slot index {index} on page {page_id} (max: {max})")]
    InvalidSlotIndex {
        page_id: PageId,
        index: usize,
        max: usize,
    },

    #[error("Serialization/deserialization error: {details}")]
    SerializationError { details: String },

    #[error("Stored definition of type '{name}' is inconsistent: {details}")]
    InconsistentDefinition { name: String, details: String },

    #[error("Catalog encoding error: {0}")]
    Catalog(#[from] serde_json::Error),

    #[error("Invalid configuration: {details}")]
    InvalidConfig { details: String },
}

impl DatabaseError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DatabaseError::Io(_) | DatabaseError::Catalog(_) => ErrorCategory::Io,
            DatabaseError::CapacityExhausted { .. } => ErrorCategory::Capacity,
            DatabaseError::TypeNotFound { .. } | DatabaseError::RecordNotFound { .. } => {
                ErrorCategory::NotFound
            }
            _ => ErrorCategory::Validation,
        }
    }
}

pub type Result<T> = std::result::Result<T, DatabaseError>;
