use crate::types::{PageId, SlotId, error::DatabaseError, record::Record};

/// Physical address of a record: page index within the type's file and slot within the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLocation {
    pub page_id: PageId,
    pub slot: SlotId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocatedRecord {
    pub location: RecordLocation,
    pub record: Record,
}

pub trait Scanner {
    fn scan(&mut self) -> Result<Option<LocatedRecord>, DatabaseError>;
    fn scan_batch(&mut self, batch_size: usize) -> Result<Vec<LocatedRecord>, DatabaseError>;
    fn reset(&mut self) -> Result<(), DatabaseError>;
}

pub struct ScanIterator<S: Scanner> {
    scanner: S,
}

impl<S: Scanner> ScanIterator<S> {
    pub fn new(scanner: S) -> Self {
        Self { scanner }
    }
}

impl<S: Scanner> Iterator for ScanIterator<S> {
    type Item = Result<LocatedRecord, DatabaseError>;
    fn next(&mut self) -> Option<Self::Item> {
        match self.scanner.scan() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}
