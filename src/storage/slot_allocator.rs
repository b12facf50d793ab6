use crate::types::{BITMAP_SIZE, MAX_BITMAP_SLOTS, PAGE_SIZE, SlotId};

/// Per-page occupancy bitmap. Bit `i` set means slot `i` holds a live record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotBitmap(u16);

impl SlotBitmap {
    pub fn new(bits: u16) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> u16 {
        self.0
    }

    pub fn from_le_bytes(bytes: [u8; BITMAP_SIZE]) -> Self {
        Self(u16::from_le_bytes(bytes))
    }

    pub fn to_le_bytes(self) -> [u8; BITMAP_SIZE] {
        self.0.to_le_bytes()
    }

    pub fn is_occupied(&self, slot: SlotId) -> bool {
        slot < MAX_BITMAP_SLOTS && self.0 & (1 << slot) != 0
    }

    /// Lowest free slot below `capacity`, scanning upward.
    pub fn first_free_slot(&self, capacity: usize) -> Option<SlotId> {
        (0..capacity.min(MAX_BITMAP_SLOTS)).find(|&slot| !self.is_occupied(slot))
    }

    pub fn mark_occupied(self, slot: SlotId) -> Self {
        if slot >= MAX_BITMAP_SLOTS {
            return self;
        }
        Self(self.0 | (1 << slot))
    }

    pub fn mark_free(self, slot: SlotId) -> Self {
        if slot >= MAX_BITMAP_SLOTS {
            return self;
        }
        Self(self.0 & !(1 << slot))
    }

    /// Occupied slots below `capacity`, ascending.
    pub fn occupied_slots(self, capacity: usize) -> impl Iterator<Item = SlotId> {
        (0..capacity.min(MAX_BITMAP_SLOTS)).filter(move |&slot| self.is_occupied(slot))
    }
}

/// Number of usable slots per page for records of `record_size` bytes.
pub fn slot_capacity(record_size: usize, max_records_per_page: usize) -> usize {
    let fits = (PAGE_SIZE - BITMAP_SIZE).checked_div(record_size).unwrap_or(0);
    fits.min(max_records_per_page).min(MAX_BITMAP_SLOTS)
}
