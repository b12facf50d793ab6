use std::{
    fs::{File, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::Utc;

use crate::types::error::DatabaseError;

fn append_line(path: &Path, line: &str) -> Result<(), DatabaseError> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", line)?;
    file.flush()?;
    Ok(())
}

/// Append-only audit trail: `<unix timestamp>, <command>, <success|failure>`.
#[derive(Debug, Clone)]
pub struct OperationLog {
    path: PathBuf,
}

impl OperationLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format_entry(timestamp: i64, command: &str, success: bool) -> String {
        let status = if success { "success" } else { "failure" };
        format!("{}, {}, {}", timestamp, command, status)
    }

    pub fn record(&self, command: &str, success: bool) -> Result<(), DatabaseError> {
        let entry = Self::format_entry(Utc::now().timestamp(), command, success);
        append_line(&self.path, &entry)
    }
}

/// Destination for search results, one space-joined record per line.
#[derive(Debug, Clone)]
pub struct ResultWriter {
    path: PathBuf,
}

impl ResultWriter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Empty the results file, creating it if needed.
    pub fn truncate(&self) -> Result<(), DatabaseError> {
        File::create(&self.path)?;
        Ok(())
    }

    pub fn write_line(&self, line: &str) -> Result<(), DatabaseError> {
        append_line(&self.path, line)
    }
}
