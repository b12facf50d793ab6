pub mod error;
pub mod page;
pub mod record;
pub mod value;

// Common type aliases
pub type PageId = u64;
pub type SlotId = usize;

// On-disk layout constants
pub const PAGE_SIZE: usize = 4096;
pub const BITMAP_SIZE: usize = 2; // u16 occupancy bitmap at the start of every page
pub const MAX_BITMAP_SLOTS: usize = BITMAP_SIZE * 8;

pub const VALIDITY_BYTE_SIZE: usize = 1;
pub const INTEGER_FIELD_SIZE: usize = 4; // i32, little-endian

pub const RECORD_LIVE: u8 = 1;
pub const RECORD_TOMBSTONE: u8 = 0;
