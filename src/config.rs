//! Archive configuration.
//!
//! All limits default to the values the on-disk format was designed around
//! (10 records per page, 6 fields per type, 50-byte text fields, 100 pages per
//! type). Every limit can be overridden from the environment via
//! `ArchiveConfig::from_env()` or through the `with_*` setters.
//!
//! The page size is not configurable; see `types::PAGE_SIZE`.

use std::path::{Path, PathBuf};

use crate::types::{MAX_BITMAP_SLOTS, error::DatabaseError};

pub const CATALOG_FILE_NAME: &str = "system_catalog.json";
pub const LOG_FILE_NAME: &str = "log.csv";
pub const OUTPUT_FILE_NAME: &str = "output.txt";
pub const HISTORY_FILE_NAME: &str = ".dune_history";

#[derive(Clone, Debug)]
pub struct ArchiveConfig {
    /// Directory holding the catalog, logs, results and `<type>.dat` files.
    /// Env: DUNE_DATA_DIR (default ".")
    pub data_dir: PathBuf,

    /// Global cap on live records per page, at most 16 (bitmap width).
    /// Env: DUNE_MAX_RECORDS_PER_PAGE (default 10)
    pub max_records_per_page: usize,

    /// Env: DUNE_MAX_FIELDS_PER_TYPE (default 6)
    pub max_fields_per_type: usize,

    /// Env: DUNE_MAX_TYPE_NAME_LENGTH (default 12)
    pub max_type_name_length: usize,

    /// Env: DUNE_MAX_FIELD_NAME_LENGTH (default 20)
    pub max_field_name_length: usize,

    /// Byte width of every Text field of newly created types.
    /// Env: DUNE_MAX_TEXT_LENGTH (default 50)
    pub max_text_length: usize,

    /// Pages scanned for a free slot when creating a record. Beyond this a
    /// type is full.
    /// Env: DUNE_MAX_PAGES_PER_TYPE (default 100)
    pub max_pages_per_type: u64,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            max_records_per_page: 10,
            max_fields_per_type: 6,
            max_type_name_length: 12,
            max_field_name_length: 20,
            max_text_length: 50,
            max_pages_per_type: 100,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse::<T>().ok())
}

impl ArchiveConfig {
    /// Defaults overridden by any parsable `DUNE_*` environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("DUNE_DATA_DIR") {
            if !v.trim().is_empty() {
                cfg.data_dir = PathBuf::from(v.trim());
            }
        }
        if let Some(n) = env_parse("DUNE_MAX_RECORDS_PER_PAGE") {
            cfg.max_records_per_page = n;
        }
        if let Some(n) = env_parse("DUNE_MAX_FIELDS_PER_TYPE") {
            cfg.max_fields_per_type = n;
        }
        if let Some(n) = env_parse("DUNE_MAX_TYPE_NAME_LENGTH") {
            cfg.max_type_name_length = n;
        }
        if let Some(n) = env_parse("DUNE_MAX_FIELD_NAME_LENGTH") {
            cfg.max_field_name_length = n;
        }
        if let Some(n) = env_parse("DUNE_MAX_TEXT_LENGTH") {
            cfg.max_text_length = n;
        }
        if let Some(n) = env_parse("DUNE_MAX_PAGES_PER_TYPE") {
            cfg.max_pages_per_type = n;
        }

        cfg
    }

    pub fn with_data_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.data_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_max_records_per_page(mut self, n: usize) -> Self {
        self.max_records_per_page = n;
        self
    }

    pub fn with_max_fields_per_type(mut self, n: usize) -> Self {
        self.max_fields_per_type = n;
        self
    }

    pub fn with_max_text_length(mut self, n: usize) -> Self {
        self.max_text_length = n;
        self
    }

    pub fn with_max_pages_per_type(mut self, n: u64) -> Self {
        self.max_pages_per_type = n;
        self
    }

    pub fn validate(&self) -> Result<(), DatabaseError> {
        if self.max_records_per_page == 0 || self.max_records_per_page > MAX_BITMAP_SLOTS {
            return Err(DatabaseError::InvalidConfig {
                details: format!(
                    "max_records_per_page must be in 1..={}, got {}",
                    MAX_BITMAP_SLOTS, self.max_records_per_page
                ),
            });
        }
        let zero = [
            ("max_fields_per_type", self.max_fields_per_type as u64),
            ("max_type_name_length", self.max_type_name_length as u64),
            ("max_field_name_length", self.max_field_name_length as u64),
            ("max_text_length", self.max_text_length as u64),
            ("max_pages_per_type", self.max_pages_per_type),
        ]
        .into_iter()
        .find(|(_, v)| *v == 0);
        if let Some((name, _)) = zero {
            return Err(DatabaseError::InvalidConfig {
                details: format!("{} must be positive", name),
            });
        }
        Ok(())
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join(CATALOG_FILE_NAME)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }

    pub fn output_path(&self) -> PathBuf {
        self.data_dir.join(OUTPUT_FILE_NAME)
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join(HISTORY_FILE_NAME)
    }
}
