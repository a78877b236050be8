//! rusty-board/crates/rb-core/src/lib.rs
//!
//! The central domain logic and interface definitions for Rusty-Board:
//! thread/reply records, the storage ports, and the load/save contract that
//! keeps image bytes out of durable storage.

pub mod error;
pub mod ids;
pub mod memory;
pub mod models;
pub mod sanitize;
pub mod store;
pub mod time;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use ids::generate_id;
pub use memory::MemoryKvStore;
pub use models::*;
pub use store::{PostStore, STORAGE_KEY};
pub use time::{format_timestamp, format_timestamp_in};
pub use traits::*;
