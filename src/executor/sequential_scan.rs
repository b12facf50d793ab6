use log::{debug, warn};

use crate::{
    executor::scan::{LocatedRecord, RecordLocation, Scanner},
    storage::{page_store::PageStore, schema::TypeDefinition},
    types::{PageId, SlotId, error::DatabaseError, page::Page, record::Record},
};

/// Walks every live record of one type: pages ascending, then occupied
/// slots ascending. The page count is fixed when the scanner is created.
pub struct SequentialScanner<'a> {
    page_store: &'a PageStore,
    schema: &'a TypeDefinition,
    page_count: PageId,
    current_page_id: PageId,
    current_page: Option<Page>,
    current_slot_index: SlotId,
    is_exhausted: bool,
}

impl<'a> SequentialScanner<'a> {
    pub fn new(
        page_store: &'a PageStore,
        schema: &'a TypeDefinition,
    ) -> Result<Self, DatabaseError> {
        let page_count = page_store.page_count(&schema.name)?;
        debug!("scanning '{}' over {} page(s)", schema.name, page_count);
        Ok(Self {
            page_store,
            schema,
            page_count,
            current_page_id: 0,
            current_page: None,
            current_slot_index: 0,
            is_exhausted: false,
        })
    }

    pub fn page_count(&self) -> PageId {
        self.page_count
    }

    fn advance_page(&mut self) {
        self.current_page = None;
        self.current_page_id += 1;
        self.current_slot_index = 0;
    }
}

impl Scanner for SequentialScanner<'_> {
    fn scan(&mut self) -> Result<Option<LocatedRecord>, DatabaseError> {
        while !self.is_exhausted {
            if self.current_page_id >= self.page_count {
                self.is_exhausted = true;
                break;
            }

            if self.current_page.is_none() {
                match self.page_store.load_page(&self.schema.name, self.current_page_id)? {
                    Some(page) => self.current_page = Some(page),
                    None => {
                        self.advance_page();
                        continue;
                    }
                }
            }

            let Some(page) = self.current_page.as_ref() else {
                continue;
            };
            let bitmap = page.bitmap();
            let start = self.current_slot_index;
            for slot in bitmap
                .occupied_slots(self.schema.slots_per_page)
                .filter(|&slot| slot >= start)
            {
                self.current_slot_index = slot + 1;
                let bytes = page.record_bytes(slot, self.schema.record_size)?;
                match Record::from_bytes(self.schema, bytes)? {
                    Some(record) => {
                        return Ok(Some(LocatedRecord {
                            location: RecordLocation {
                                page_id: self.current_page_id,
                                slot,
                            },
                            record,
                        }));
                    }
                    None => warn!(
                        "slot {} of page {} in '{}' is marked occupied but tombstoned",
                        slot, self.current_page_id, self.schema.name
                    ),
                }
            }
            self.advance_page();
        }
        Ok(None)
    }

    fn scan_batch(&mut self, batch_size: usize) -> Result<Vec<LocatedRecord>, DatabaseError> {
        let mut records = Vec::with_capacity(batch_size);
        for _ in 0..batch_size {
            match self.scan()? {
                Some(record) => records.push(record),
                None => break,
            }
        }
        Ok(records)
    }

    fn reset(&mut self) -> Result<(), DatabaseError> {
        self.page_count = self.page_store.page_count(&self.schema.name)?;
        self.current_page_id = 0;
        self.current_page = None;
        self.current_slot_index = 0;
        self.is_exhausted = false;
        Ok(())
    }
}
