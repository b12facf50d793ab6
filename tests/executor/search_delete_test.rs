use dune_archive::{
    executor::{
        scan::{ScanIterator, Scanner},
        search::find_by_primary_key,
    },
    storage::schema::FieldSchema,
    types::{
        error::{DatabaseError, ErrorCategory},
        value::{FieldKind, Value},
    },
    utils::mock::player_archive,
};

#[test]
fn test_search_returns_stored_values() -> Result<(), DatabaseError> {
    let (_archive, mut storage) = player_archive()?;
    storage.create_record("Player", vec![Value::Integer(1), "Ada".into()])?;
    storage.create_record("Player", vec![Value::Integer(2), "Bob".into()])?;

    let record = storage.search_record("Player", &Value::Integer(2))?;
    assert_eq!(record.values, vec![Value::Integer(2), Value::Text("Bob".into())]);
    Ok(())
}

#[test]
fn test_search_missing_key() -> Result<(), DatabaseError> {
    let (_archive, mut storage) = player_archive()?;
    storage.create_record("Player", vec![Value::Integer(1), "Ada".into()])?;

    let err = storage
        .search_record("Player", &Value::Integer(42))
        .unwrap_err();
    assert!(matches!(err, DatabaseError::RecordNotFound { .. }));
    assert_eq!(err.category(), ErrorCategory::NotFound);
    assert!(storage.find_record("Player", &Value::Integer(42))?.is_none());
    Ok(())
}

#[test]
fn test_delete_then_search_fails() -> Result<(), DatabaseError> {
    let (_archive, mut storage) = player_archive()?;
    storage.create_record("Player", vec![Value::Integer(1), "Ada".into()])?;
    storage.create_record("Player", vec![Value::Integer(2), "Bob".into()])?;

    storage.delete_record("Player", &Value::Integer(1))?;
    assert!(storage.search_record("Player", &Value::Integer(1)).is_err());
    assert!(storage.search_record("Player", &Value::Integer(2)).is_ok());

    // A second delete finds nothing
    assert!(matches!(
        storage.delete_record("Player", &Value::Integer(1)),
        Err(DatabaseError::RecordNotFound { .. })
    ));

    // The key is free again once its record is tombstoned
    storage.create_record("Player", vec![Value::Integer(1), "Alia".into()])?;
    assert_eq!(
        storage.search_record("Player", &Value::Integer(1))?.values[1],
        Value::Text("Alia".into())
    );
    Ok(())
}

#[test]
fn test_delete_keeps_file_size() -> Result<(), DatabaseError> {
    let (_archive, mut storage) = player_archive()?;
    for id in 0..15 {
        storage.create_record("Player", vec![Value::Integer(id), "Harkonnen".into()])?;
    }
    let before = storage.page_store().file_size("Player")?;
    for id in 0..15 {
        storage.delete_record("Player", &Value::Integer(id))?;
    }
    assert_eq!(storage.page_store().file_size("Player")?, before);
    assert_eq!(storage.page_count("Player")?, 2);
    assert!(storage.scan_type("Player")?.is_empty());
    Ok(())
}

#[test]
fn test_text_key_falls_back_to_string_comparison() -> Result<(), DatabaseError> {
    let (_archive, mut storage) = player_archive()?;
    storage.create_record("Player", vec![Value::Integer(12), "Ada".into()])?;

    // A textual "12" still matches the integer key 12
    let record = storage.search_record("Player", &Value::Text("12".into()))?;
    assert_eq!(record.values[1], Value::Text("Ada".into()));

    storage.delete_record("Player", &Value::Text("12".into()))?;
    assert!(storage.find_record("Player", &Value::Integer(12))?.is_none());
    Ok(())
}

#[test]
fn test_text_primary_key_on_second_field() -> Result<(), DatabaseError> {
    let (_archive, mut storage) = player_archive()?;
    storage.create_type(
        "Spice",
        vec![
            FieldSchema::new("amount", FieldKind::Integer),
            FieldSchema::new("harvester", FieldKind::Text),
        ],
        2,
    )?;
    storage.create_record("Spice", vec![Value::Integer(300), "Alpha".into()])?;
    storage.create_record("Spice", vec![Value::Integer(300), "Beta".into()])?;

    let record = storage.search_record("Spice", &"Beta".into())?;
    assert_eq!(record.values[0], Value::Integer(300));
    assert!(storage.search_record("Spice", &Value::Integer(300)).is_err());
    Ok(())
}

#[test]
fn test_scanner_yields_locations_in_order() -> Result<(), DatabaseError> {
    let (_archive, mut storage) = player_archive()?;
    for id in 0..13 {
        storage.create_record("Player", vec![Value::Integer(id), "Fedaykin".into()])?;
    }
    storage.delete_record("Player", &Value::Integer(4))?;
    storage.delete_record("Player", &Value::Integer(11))?;

    let scanner = storage.create_scanner("Player")?;
    assert_eq!(scanner.page_count(), 2);
    let locations: Vec<(u64, usize)> = ScanIterator::new(scanner)
        .map(|r| r.map(|located| (located.location.page_id, located.location.slot)))
        .collect::<Result<_, _>>()?;

    let mut expected: Vec<(u64, usize)> = (0..10).filter(|&s| s != 4).map(|s| (0, s)).collect();
    expected.extend([(1, 0), (1, 2)]);
    assert_eq!(locations, expected);
    Ok(())
}

#[test]
fn test_scanner_batch_and_reset() -> Result<(), DatabaseError> {
    let (_archive, mut storage) = player_archive()?;
    for id in 0..5 {
        storage.create_record("Player", vec![Value::Integer(id), "Mentat".into()])?;
    }

    let mut scanner = storage.create_scanner("Player")?;
    assert_eq!(scanner.scan_batch(3)?.len(), 3);
    assert_eq!(scanner.scan_batch(3)?.len(), 2);
    assert!(scanner.scan()?.is_none());

    scanner.reset()?;
    let first = scanner.scan()?.unwrap();
    assert_eq!(first.record.values[0], Value::Integer(0));
    Ok(())
}

#[test]
fn test_find_on_empty_type() -> Result<(), DatabaseError> {
    let (_archive, storage) = player_archive()?;
    let schema = storage.get_type("Player").unwrap();
    assert!(find_by_primary_key(storage.page_store(), schema, &Value::Integer(1))?.is_none());
    Ok(())
}
