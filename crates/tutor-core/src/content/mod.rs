//! Curriculum content store port.
//!
//! - `ContentStore`: RPITIT trait for concrete stores
//! - `BoxContentStore`: object-safe wrapper for dynamic dispatch

pub mod box_store;
pub mod store;
