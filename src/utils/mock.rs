use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::{
    config::ArchiveConfig,
    storage::{schema::FieldSchema, storage_manager::StorageManager},
    types::{error::DatabaseError, value::FieldKind},
};

/// A scratch archive in its own temporary directory, removed on drop.
pub struct TempArchive {
    pub dir: TempDir,
    pub config: ArchiveConfig,
}

impl TempArchive {
    pub fn new() -> Result<Self, DatabaseError> {
        Self::with_config(ArchiveConfig::default())
    }

    /// Use `config` with its data directory replaced by a fresh temp dir.
    pub fn with_config(config: ArchiveConfig) -> Result<Self, DatabaseError> {
        let dir = tempfile::Builder::new().prefix("dune_test_").tempdir()?;
        let config = config.with_data_dir(dir.path());
        Ok(Self { dir, config })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file_path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn open(&self) -> Result<StorageManager, DatabaseError> {
        StorageManager::open(self.config.clone())
    }
}

/// Store with a `Player (id int, name str)` type keyed on `id`.
pub fn player_archive() -> Result<(TempArchive, StorageManager), DatabaseError> {
    let archive = TempArchive::new()?;
    let mut storage = archive.open()?;
    storage.create_type(
        "Player",
        vec![
            FieldSchema::new("id", FieldKind::Integer),
            FieldSchema::new("name", FieldKind::Text),
        ],
        1,
    )?;
    Ok((archive, storage))
}
