//! SQLite storage layer.
//!
//! The curriculum lesson store, backed by SQLite with WAL mode and split
//! read/write connection pools.

pub mod content;
pub mod pool;
