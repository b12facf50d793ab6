pub mod catalog;
pub mod page_store;
pub mod schema;
pub mod slot_allocator;
pub mod storage_manager;
