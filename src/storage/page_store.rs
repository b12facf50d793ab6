use std::{
    fs::{File, OpenOptions},
    io::{ErrorKind, Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use log::debug;

use crate::types::{PAGE_SIZE, PageId, error::DatabaseError, page::Page};

/// Reads and writes fixed-size pages in one backing file per type.
#[derive(Debug, Clone)]
pub struct PageStore {
    data_dir: PathBuf,
}

impl PageStore {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    pub fn data_file_path(&self, type_name: &str) -> PathBuf {
        self.data_dir.join(format!("{}.dat", type_name))
    }

    fn page_offset(page_id: PageId) -> u64 {
        page_id * PAGE_SIZE as u64
    }

    /// Create an empty backing file unless one already exists.
    pub fn create_file(&self, type_name: &str) -> Result<(), DatabaseError> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.data_file_path(type_name))?;
        Ok(())
    }

    pub fn file_size(&self, type_name: &str) -> Result<u64, DatabaseError> {
        match std::fs::metadata(self.data_file_path(type_name)) {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    /// Pages currently backed by the file; a partial trailing page counts.
    pub fn page_count(&self, type_name: &str) -> Result<u64, DatabaseError> {
        Ok(self.file_size(type_name)?.div_ceil(PAGE_SIZE as u64))
    }

    /// Returns `None` when the page starts at or past end-of-file. A short
    /// trailing page is zero-padded.
    pub fn load_page(&self, type_name: &str, page_id: PageId) -> Result<Option<Page>, DatabaseError> {
        let mut file = match File::open(self.data_file_path(type_name)) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let offset = Self::page_offset(page_id);
        if offset >= file.metadata()?.len() {
            return Ok(None);
        }

        let mut buffer = vec![0u8; PAGE_SIZE];
        file.seek(SeekFrom::Start(offset))?;
        let mut filled = 0;
        while filled < PAGE_SIZE {
            let n = file.read(&mut buffer[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        if filled < PAGE_SIZE {
            debug!(
                "page {} of '{}' is short ({} bytes), zero-padding",
                page_id, type_name, filled
            );
        }

        Page::from_bytes(page_id, &buffer).map(Some)
    }

    /// Write one full page, zero-extending the file up to the page's end
    /// when needed. Never shrinks the file.
    pub fn save_page(&self, type_name: &str, page_id: PageId, page: &Page) -> Result<(), DatabaseError> {
        let bytes = page.as_bytes();
        if bytes.len() != PAGE_SIZE {
            return Err(DatabaseError::InvalidPageSize {
                expected: PAGE_SIZE,
                actual: bytes.len(),
            });
        }

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.data_file_path(type_name))?;

        let offset = Self::page_offset(page_id);
        let required = offset + PAGE_SIZE as u64;
        if file.metadata()?.len() < required {
            file.set_len(required)?;
        }

        file.seek(SeekFrom::Start(offset))?;
        file.write_all(bytes)?;
        file.flush()?;
        debug!("saved page {} of '{}'", page_id, type_name);
        Ok(())
    }
}
