use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use log::{info, warn};

use crate::{
    storage::{page_store::PageStore, schema::TypeDefinition},
    types::error::DatabaseError,
};

/// Type name to definition, mirrored to a JSON file.
#[derive(Debug, Clone)]
pub struct Catalog {
    path: PathBuf,
    types: BTreeMap<String, TypeDefinition>,
}

impl Catalog {
    /// Load the catalog at `path`. A missing, empty, unreadable or corrupt
    /// file yields an empty catalog.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let types = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => match serde_json::from_str(&content) {
                Ok(types) => Self::retain_consistent(&path, types),
                Err(e) => {
                    warn!("catalog {} is corrupt ({}), starting empty", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!("catalog {} is unreadable ({}), starting empty", path.display(), e);
                BTreeMap::new()
            }
        };
        info!("loaded {} type(s) from {}", types.len(), path.display());
        Self { path, types }
    }

    /// Drop entries whose key disagrees with the stored name or whose layout
    /// does not add up. Their data files are left untouched.
    fn retain_consistent(
        path: &Path,
        mut types: BTreeMap<String, TypeDefinition>,
    ) -> BTreeMap<String, TypeDefinition> {
        types.retain(|key, definition| {
            let checked = if *key != definition.name {
                Err(DatabaseError::InconsistentDefinition {
                    name: key.clone(),
                    details: format!("entry is named '{}'", definition.name),
                })
            } else {
                definition.check_consistency()
            };
            match checked {
                Ok(()) => true,
                Err(e) => {
                    warn!("dropping type '{}' from catalog {}: {}", key, path.display(), e);
                    false
                }
            }
        });
        types
    }

    /// Overwrite the catalog file with the full in-memory mapping.
    pub fn save(&self) -> Result<(), DatabaseError> {
        let json = serde_json::to_string_pretty(&self.types)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Register a new type, persist the catalog, then create the type's
    /// empty backing file.
    pub fn define_type(
        &mut self,
        definition: TypeDefinition,
        page_store: &PageStore,
    ) -> Result<&TypeDefinition, DatabaseError> {
        let name = definition.name.clone();
        if self.types.contains_key(&name) {
            return Err(DatabaseError::TypeAlreadyExists { name });
        }

        self.types.insert(name.clone(), definition);
        if let Err(e) = self.save() {
            self.types.remove(&name);
            return Err(e);
        }
        page_store.create_file(&name)?;

        info!("defined type '{}'", name);
        self.lookup(&name)
            .ok_or(DatabaseError::TypeNotFound { name })
    }

    pub fn lookup(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn type_names(&self) -> Vec<&str> {
        self.types.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
