use dune_archive::{
    storage::slot_allocator::SlotBitmap,
    types::{BITMAP_SIZE, PAGE_SIZE, error::DatabaseError, page::Page},
};

const RECORD_SIZE: usize = 55;

fn sample_record(tag: u8) -> Vec<u8> {
    let mut bytes = vec![tag; RECORD_SIZE];
    bytes[0] = 1;
    bytes
}

#[test]
fn test_new_page_is_empty() {
    let page = Page::new(3);
    assert_eq!(page.page_id, 3);
    assert_eq!(page.as_bytes().len(), PAGE_SIZE);
    assert_eq!(page.bitmap(), SlotBitmap::default());
}

#[test]
fn test_from_bytes_requires_full_page() {
    let err = Page::from_bytes(0, &[0u8; 100]).unwrap_err();
    assert!(matches!(
        err,
        DatabaseError::InvalidPageSize { expected: PAGE_SIZE, actual: 100 }
    ));
    assert!(Page::from_bytes(0, &vec![0u8; PAGE_SIZE]).is_ok());
}

#[test]
fn test_write_record_places_bytes_and_sets_bit() {
    let mut page = Page::new(0);
    page.write_record(2, RECORD_SIZE, &sample_record(7)).unwrap();

    assert!(page.bitmap().is_occupied(2));
    assert!(!page.bitmap().is_occupied(0));
    assert_eq!(page.as_bytes()[0..BITMAP_SIZE], [0b100, 0]);

    let start = BITMAP_SIZE + 2 * RECORD_SIZE;
    assert_eq!(&page.as_bytes()[start..start + RECORD_SIZE], sample_record(7).as_slice());
    assert_eq!(page.record_bytes(2, RECORD_SIZE).unwrap(), sample_record(7).as_slice());
}

#[test]
fn test_write_record_rejects_size_mismatch() {
    let mut page = Page::new(0);
    let err = page.write_record(0, RECORD_SIZE, &[1u8; 10]).unwrap_err();
    assert!(matches!(err, DatabaseError::SerializationError { .. }));
    assert_eq!(page.bitmap(), SlotBitmap::default());
}

#[test]
fn test_slot_out_of_range() {
    let page = Page::new(0);
    // 4094 / 2000 = 2 slots fit
    assert!(page.record_bytes(1, 2000).is_ok());
    assert!(matches!(
        page.record_bytes(2, 2000),
        Err(DatabaseError::InvalidSlotIndex { index: 2, max: 2, .. })
    ));
    // Beyond the bitmap even though bytes would fit
    assert!(page.record_bytes(16, 10).is_err());
}

#[test]
fn test_tombstone_clears_bit_and_validity_only() {
    let mut page = Page::new(0);
    page.write_record(0, RECORD_SIZE, &sample_record(9)).unwrap();
    page.write_record(1, RECORD_SIZE, &sample_record(8)).unwrap();

    page.tombstone(0, RECORD_SIZE).unwrap();

    assert!(!page.bitmap().is_occupied(0));
    assert!(page.bitmap().is_occupied(1));
    let slot0 = page.record_bytes(0, RECORD_SIZE).unwrap();
    assert_eq!(slot0[0], 0);
    assert!(slot0[1..].iter().all(|&b| b == 9));
}

#[test]
fn test_bitmap_survives_byte_round_trip() {
    let mut page = Page::new(5);
    page.write_record(0, RECORD_SIZE, &sample_record(1)).unwrap();
    page.write_record(9, RECORD_SIZE, &sample_record(2)).unwrap();

    let reloaded = Page::from_bytes(5, page.as_bytes()).unwrap();
    assert_eq!(reloaded.bitmap().bits(), (1 << 0) | (1 << 9));
    assert_eq!(reloaded.bitmap().first_free_slot(10), Some(1));
}
