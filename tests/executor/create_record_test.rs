use dune_archive::{
    config::ArchiveConfig,
    executor::{
        insert::{Inserter, RecordInserter},
        scan::RecordLocation,
    },
    storage::schema::FieldSchema,
    types::{
        error::{DatabaseError, ErrorCategory},
        record::Record,
        value::{FieldKind, Value},
    },
    utils::mock::{TempArchive, player_archive},
};

fn player(id: i32, name: &str) -> Vec<Value> {
    vec![Value::Integer(id), name.into()]
}

#[test]
fn test_first_record_lands_in_page_zero_slot_zero() -> Result<(), DatabaseError> {
    let (_archive, mut storage) = player_archive()?;
    let location = storage.create_record("Player", player(1, "Ada"))?;
    assert_eq!(location, RecordLocation { page_id: 0, slot: 0 });
    assert_eq!(storage.page_count("Player")?, 1);
    Ok(())
}

#[test]
fn test_eleventh_record_opens_a_new_page() -> Result<(), DatabaseError> {
    let (_archive, mut storage) = player_archive()?;
    for id in 0..10 {
        let location = storage.create_record("Player", player(id, "Fremen"))?;
        assert_eq!(location, RecordLocation { page_id: 0, slot: id as usize });
    }

    let location = storage.create_record("Player", player(10, "Fremen"))?;
    assert_eq!(location, RecordLocation { page_id: 1, slot: 0 });
    assert_eq!(storage.page_count("Player")?, 2);
    Ok(())
}

#[test]
fn test_duplicate_primary_key_is_rejected() -> Result<(), DatabaseError> {
    let (_archive, mut storage) = player_archive()?;
    storage.create_record("Player", player(7, "Paul"))?;

    let err = storage
        .create_record("Player", player(7, "Leto"))
        .unwrap_err();
    assert!(matches!(err, DatabaseError::DuplicatePrimaryKey { .. }));

    // Original record untouched, nothing else written
    assert_eq!(storage.search_record("Player", &Value::Integer(7))?.values, player(7, "Paul"));
    assert_eq!(storage.scan_type("Player")?.len(), 1);
    Ok(())
}

#[test]
fn test_duplicate_text_key_across_pages() -> Result<(), DatabaseError> {
    let (_archive, mut storage) = player_archive()?;
    storage.create_type(
        "House",
        vec![
            FieldSchema::new("name", FieldKind::Text),
            FieldSchema::new("planet", FieldKind::Text),
        ],
        1,
    )?;
    for i in 0..12 {
        storage.create_record("House", vec![format!("House{}", i).as_str().into(), "Arrakis".into()])?;
    }
    let err = storage
        .create_record("House", vec!["House11".into(), "Kaitain".into()])
        .unwrap_err();
    assert!(matches!(err, DatabaseError::DuplicatePrimaryKey { .. }));
    Ok(())
}

#[test]
fn test_value_validation() -> Result<(), DatabaseError> {
    let (_archive, mut storage) = player_archive()?;

    assert!(matches!(
        storage.create_record("Player", vec![Value::Integer(1)]),
        Err(DatabaseError::FieldCountMismatch { expected: 2, actual: 1 })
    ));
    assert!(matches!(
        storage.create_record("Player", vec!["one".into(), "Ada".into()]),
        Err(DatabaseError::InvalidValue { .. })
    ));
    assert!(matches!(
        storage.create_record("Player", player(1, "12345")),
        Err(DatabaseError::InvalidValue { .. })
    ));
    assert!(matches!(
        storage.create_record("Player", player(1, "not_valid")),
        Err(DatabaseError::InvalidValue { .. })
    ));

    assert!(storage.scan_type("Player")?.is_empty());
    Ok(())
}

#[test]
fn test_capacity_exhausted() -> Result<(), DatabaseError> {
    let archive = TempArchive::with_config(
        ArchiveConfig::default()
            .with_max_pages_per_type(1)
            .with_max_records_per_page(2),
    )?;
    let mut storage = archive.open()?;
    storage.create_type(
        "Player",
        vec![
            FieldSchema::new("id", FieldKind::Integer),
            FieldSchema::new("name", FieldKind::Text),
        ],
        1,
    )?;

    storage.create_record("Player", player(1, "Ada"))?;
    storage.create_record("Player", player(2, "Bob"))?;
    let err = storage.create_record("Player", player(3, "Cy")).unwrap_err();
    assert!(matches!(
        err,
        DatabaseError::CapacityExhausted { max_pages: 1, .. }
    ));
    assert_eq!(err.category(), ErrorCategory::Capacity);

    // Freeing a slot makes room again
    storage.delete_record("Player", &Value::Integer(1))?;
    let location = storage.create_record("Player", player(3, "Cy"))?;
    assert_eq!(location, RecordLocation { page_id: 0, slot: 0 });
    Ok(())
}

#[test]
fn test_page_capacity_limited_by_record_size() -> Result<(), DatabaseError> {
    // Four 1000-byte text fields: 4001-byte records, one per page
    let archive = TempArchive::with_config(ArchiveConfig::default().with_max_text_length(1000))?;
    let mut storage = archive.open()?;
    storage.create_type(
        "Scroll",
        (0..4)
            .map(|i| FieldSchema::new(format!("part{}", i), FieldKind::Text))
            .collect(),
        1,
    )?;

    let scroll = |tag: &str| -> Vec<Value> {
        vec![tag.into(), "b".into(), "c".into(), "d".into()]
    };
    assert_eq!(
        storage.create_record("Scroll", scroll("a1"))?,
        RecordLocation { page_id: 0, slot: 0 }
    );
    assert_eq!(
        storage.create_record("Scroll", scroll("a2"))?,
        RecordLocation { page_id: 1, slot: 0 }
    );
    Ok(())
}

#[test]
fn test_deleted_slot_is_reused_first_fit() -> Result<(), DatabaseError> {
    let (_archive, mut storage) = player_archive()?;
    for id in 0..12 {
        storage.create_record("Player", player(id, "Sardaukar"))?;
    }

    let freed = storage.delete_record("Player", &Value::Integer(3))?;
    assert_eq!(freed, RecordLocation { page_id: 0, slot: 3 });

    let location = storage.create_record("Player", player(99, "Chani"))?;
    assert_eq!(location, freed);
    assert_eq!(storage.page_count("Player")?, 2);
    Ok(())
}

#[test]
fn test_inserter_batch_stops_at_first_failure() -> Result<(), DatabaseError> {
    let (_archive, storage) = player_archive()?;
    let schema = storage.get_type("Player").unwrap();
    let mut inserter = RecordInserter::new(storage.page_store(), schema, 100);
    assert_eq!(inserter.type_name(), "Player");

    let result = inserter.insert_batch(vec![
        Record::new(player(1, "Ada")),
        Record::new(player(1, "Again")),
        Record::new(player(2, "Bob")),
    ]);
    assert!(matches!(result, Err(DatabaseError::DuplicatePrimaryKey { .. })));

    let ids: Vec<Value> = storage
        .scan_type("Player")?
        .into_iter()
        .map(|r| r.values[0].clone())
        .collect();
    assert_eq!(ids, vec![Value::Integer(1)]);
    Ok(())
}
