use std::{fs, path::Path};

use log::{debug, info, warn};

use crate::{
    command::{
        output::{OperationLog, ResultWriter},
        parser::{Command, CommandParser},
    },
    executor::scan::RecordLocation,
    storage::storage_manager::StorageManager,
    types::{
        error::DatabaseError,
        record::Record,
        value::Value,
    },
};

/// Result of one successfully executed command.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    TypeCreated { type_name: String },
    RecordCreated(RecordLocation),
    Found(Record),
    Deleted(RecordLocation),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Runs protocol lines against a store, logging every outcome and writing
/// search hits to the results file.
pub struct CommandProcessor {
    storage: StorageManager,
    parser: CommandParser,
    log: OperationLog,
    results: ResultWriter,
}

impl CommandProcessor {
    pub fn new(storage: StorageManager) -> Self {
        let log = OperationLog::new(storage.config().log_path());
        let results = ResultWriter::new(storage.config().output_path());
        Self {
            storage,
            parser: CommandParser::new(),
            log,
            results,
        }
    }

    pub fn storage(&self) -> &StorageManager {
        &self.storage
    }

    pub fn into_storage(self) -> StorageManager {
        self.storage
    }

    pub fn results(&self) -> &ResultWriter {
        &self.results
    }

    /// Execute one line. Blank lines return `None` and are not logged;
    /// anything else produces exactly one log entry.
    pub fn execute(&mut self, line: &str) -> Option<Result<Outcome, DatabaseError>> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let result = self
            .parser
            .parse_command(line)
            .and_then(|command| self.apply(command));

        match &result {
            Ok(outcome) => debug!("'{}' -> {:?}", line, outcome),
            Err(e) => warn!("'{}' failed ({:?}): {}", line, e.category(), e),
        }
        if let Err(e) = self.log.record(line, result.is_ok()) {
            warn!("could not write operation log: {}", e);
        }
        Some(result)
    }

    pub fn apply(&mut self, command: Command) -> Result<Outcome, DatabaseError> {
        match command {
            Command::CreateType {
                type_name,
                primary_key_order,
                fields,
            } => {
                self.storage
                    .create_type(&type_name, fields, primary_key_order)?;
                Ok(Outcome::TypeCreated { type_name })
            }
            Command::CreateRecord { type_name, values } => {
                let values = self.convert_values(&type_name, &values)?;
                let location = self.storage.create_record(&type_name, values)?;
                Ok(Outcome::RecordCreated(location))
            }
            Command::SearchRecord { type_name, key } => {
                let key = self.convert_key(&type_name, &key)?;
                let record = self.storage.search_record(&type_name, &key)?;
                let line = record
                    .values
                    .iter()
                    .map(Value::to_string)
                    .collect::<Vec<_>>()
                    .join(" ");
                self.results.write_line(&line)?;
                Ok(Outcome::Found(record))
            }
            Command::DeleteRecord { type_name, key } => {
                let key = self.convert_key(&type_name, &key)?;
                let location = self.storage.delete_record(&type_name, &key)?;
                Ok(Outcome::Deleted(location))
            }
        }
    }

    fn convert_values(&self, type_name: &str, tokens: &[String]) -> Result<Vec<Value>, DatabaseError> {
        let schema = self
            .storage
            .get_type(type_name)
            .ok_or_else(|| DatabaseError::TypeNotFound {
                name: type_name.to_string(),
            })?;
        if tokens.len() != schema.field_count() {
            return Err(DatabaseError::FieldCountMismatch {
                expected: schema.field_count(),
                actual: tokens.len(),
            });
        }
        schema
            .fields
            .iter()
            .zip(tokens)
            .map(|(field, token)| {
                Value::from_string(token, field.kind).map_err(|_| DatabaseError::InvalidValue {
                    field: field.name.clone(),
                    value: token.clone(),
                    reason: format!("expected {}", field.kind),
                })
            })
            .collect()
    }

    fn convert_key(&self, type_name: &str, token: &str) -> Result<Value, DatabaseError> {
        let schema = self
            .storage
            .get_type(type_name)
            .ok_or_else(|| DatabaseError::TypeNotFound {
                name: type_name.to_string(),
            })?;
        let field = schema
            .primary_key_field()
            .ok_or(DatabaseError::PrimaryKeyOutOfRange {
                order: schema.primary_key_order,
                field_count: schema.field_count(),
            })?;
        Ok(Value::coerce_key(token, field.kind))
    }

    /// Process every line of `input` in order after emptying the results file.
    pub fn run_file<P: AsRef<Path>>(&mut self, input: P) -> Result<RunSummary, DatabaseError> {
        let content = fs::read_to_string(input.as_ref())?;
        self.results.truncate()?;

        let mut summary = RunSummary::default();
        for line in content.lines() {
            match self.execute(line) {
                Some(Ok(_)) => summary.succeeded += 1,
                Some(Err(_)) => summary.failed += 1,
                None => continue,
            }
            summary.processed += 1;
        }

        info!(
            "processed {} command(s) from {}: {} succeeded, {} failed",
            summary.processed,
            input.as_ref().display(),
            summary.succeeded,
            summary.failed
        );
        Ok(summary)
    }
}
