//! Application services.

pub mod slug;
pub mod storage;

pub use storage::Storage;
