pub mod delete;
pub mod insert;
pub mod scan;
pub mod search;
pub mod sequential_scan;
