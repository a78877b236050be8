//! # PostStore
//!
//! Saves and loads the whole thread collection under one key.
//! `save` always overwrites; `load` never fails and heals a corrupted key by
//! erasing it.

use std::sync::Arc;

use crate::models::Thread;
use crate::sanitize;
use crate::traits::KeyValueStore;

/// Key the collection lives under unless configured otherwise.
pub const STORAGE_KEY: &str = "imageboard_posts";

pub struct PostStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
}

impl PostStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(kv, STORAGE_KEY)
    }

    pub fn with_key(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self { kv, key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Serializes the full collection, replacing the previous value.
    /// Transient image handles are not part of the serialized form.
    ///
    /// Write failures (a full disk, a quota) are returned untouched.
    pub async fn save(&self, threads: &[Thread]) -> anyhow::Result<()> {
        let json = serde_json::to_string(threads)?;
        self.kv.set(&self.key, &json).await
    }

    /// Reads and sanitizes the collection.
    ///
    /// A missing key yields an empty collection. If the value cannot be read
    /// or parsed, the key is erased and an empty collection returned.
    pub async fn load(&self) -> Vec<Thread> {
        match self.read().await {
            Ok(threads) => threads,
            Err(err) => {
                log::error!("error loading posts from '{}': {err:#}", self.key);
                if let Err(err) = self.kv.remove(&self.key).await {
                    log::error!("could not erase corrupted key '{}': {err:#}", self.key);
                }
                Vec::new()
            }
        }
    }

    async fn read(&self) -> anyhow::Result<Vec<Thread>> {
        match self.kv.get(&self.key).await? {
            Some(raw) if !raw.is_empty() => Ok(sanitize::parse_collection(&raw)?),
            _ => Ok(Vec::new()),
        }
    }
}
