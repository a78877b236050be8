//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.

use async_trait::async_trait;

use crate::models::ImageUpload;

/// A string key-value store scoped to one board.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    /// Replaces whatever was stored under `key`.
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
    /// Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}

/// Session-scoped image handles (`blob:` style URLs).
///
/// Handles are only valid until released and never survive the process.
pub trait ImageHandleStore: Send + Sync {
    /// Keeps the upload in memory and returns a displayable handle.
    fn acquire(&self, image: ImageUpload) -> anyhow::Result<String>;
    fn resolve(&self, handle: &str) -> Option<ImageUpload>;
    /// Returns `false` if the handle was unknown or already released.
    fn release(&self, handle: &str) -> bool;
    fn live_handles(&self) -> usize;
}
