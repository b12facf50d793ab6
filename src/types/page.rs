use crate::{
    storage::slot_allocator::SlotBitmap,
    types::{
        BITMAP_SIZE, MAX_BITMAP_SLOTS, PAGE_SIZE, PageId, RECORD_TOMBSTONE, SlotId,
        error::DatabaseError,
    },
};

/*
 * Page Layout on Disk (fixed-slot page)
 * ┌─────────────────────────────────────────────────────────────────┐
 * │ BITMAP (2 bytes, u16 LE): bit i set => slot i holds a record    │
 * ├─────────────────────────────────────────────────────────────────┤
 * │ SLOT 0 [valid(1) | fields ...]      (record_size bytes)         │
 * │ SLOT 1 [valid(1) | fields ...]                                  │
 * │ ...                                                             │
 * │ SLOT capacity-1                                                 │
 * ├─────────────────────────────────────────────────────────────────┤
 * │ UNUSED TAIL (zero)                                              │
 * └─────────────────────────────────────────────────────────────────┘
 */

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub page_id: PageId,
    pub data: Vec<u8>,
}

impl Page {
    pub fn new(page_id: PageId) -> Self {
        Self {
            page_id,
            data: vec![0; PAGE_SIZE],
        }
    }

    pub fn from_bytes(page_id: PageId, bytes: &[u8]) -> Result<Self, DatabaseError> {
        if bytes.len() != PAGE_SIZE {
            return Err(DatabaseError::InvalidPageSize {
                expected: PAGE_SIZE,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            page_id,
            data: bytes.to_vec(),
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn bitmap(&self) -> SlotBitmap {
        SlotBitmap::from_le_bytes([self.data[0], self.data[1]])
    }

    pub fn set_bitmap(&mut self, bitmap: SlotBitmap) {
        self.data[..BITMAP_SIZE].copy_from_slice(&bitmap.to_le_bytes());
    }

    fn slot_range(&self, slot: SlotId, record_size: usize) -> Result<std::ops::Range<usize>, DatabaseError> {
        let fits = slots_that_fit(record_size);
        if slot >= MAX_BITMAP_SLOTS || slot >= fits {
            return Err(DatabaseError::InvalidSlotIndex {
                page_id: self.page_id,
                index: slot,
                max: MAX_BITMAP_SLOTS.min(fits),
            });
        }
        let start = BITMAP_SIZE + slot * record_size;
        Ok(start..start + record_size)
    }

    pub fn record_bytes(&self, slot: SlotId, record_size: usize) -> Result<&[u8], DatabaseError> {
        let range = self.slot_range(slot, record_size)?;
        Ok(&self.data[range])
    }

    /// Place an encoded record into `slot` and mark the slot occupied.
    pub fn write_record(
        &mut self,
        slot: SlotId,
        record_size: usize,
        record: &[u8],
    ) -> Result<(), DatabaseError> {
        if record.len() != record_size {
            return Err(DatabaseError::SerializationError {
                details: format!(
                    "Record is {} bytes, slot holds {}",
                    record.len(),
                    record_size
                ),
            });
        }
        let range = self.slot_range(slot, record_size)?;
        self.data[range].copy_from_slice(record);
        self.set_bitmap(self.bitmap().mark_occupied(slot));
        Ok(())
    }

    /// Free `slot` in the bitmap and zero its validity byte. The rest of the
    /// record bytes stay in place.
    pub fn tombstone(&mut self, slot: SlotId, record_size: usize) -> Result<(), DatabaseError> {
        let range = self.slot_range(slot, record_size)?;
        self.data[range.start] = RECORD_TOMBSTONE;
        self.set_bitmap(self.bitmap().mark_free(slot));
        Ok(())
    }
}

fn slots_that_fit(record_size: usize) -> usize {
    (PAGE_SIZE - BITMAP_SIZE).checked_div(record_size).unwrap_or(0)
}
