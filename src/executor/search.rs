use crate::{
    executor::{
        scan::{LocatedRecord, Scanner},
        sequential_scan::SequentialScanner,
    },
    storage::{page_store::PageStore, schema::TypeDefinition},
    types::{error::DatabaseError, value::Value},
};

/// First live record whose primary key matches `key` under
/// [`Value::key_matches`], or `None` after a full scan.
pub fn find_by_primary_key(
    page_store: &PageStore,
    schema: &TypeDefinition,
    key: &Value,
) -> Result<Option<LocatedRecord>, DatabaseError> {
    let pk_index = schema.primary_key_index();
    let mut scanner = SequentialScanner::new(page_store, schema)?;
    while let Some(located) = scanner.scan()? {
        if located
            .record
            .get_value(pk_index)
            .is_some_and(|pk| pk.key_matches(key))
        {
            return Ok(Some(located));
        }
    }
    Ok(None)
}
