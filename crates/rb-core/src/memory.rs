//! In-process `KeyValueStore`, used by tests and throwaway sessions.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use anyhow::bail;
use async_trait::async_trait;

use crate::traits::KeyValueStore;

#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, String>>,
    /// Largest value `set` accepts, in bytes. Mimics a browser storage quota.
    quota: Option<usize>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: Mutex::default(),
            quota: Some(quota),
        }
    }

    /// Seeds a raw value, bypassing the quota.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.entries().insert(key.to_string(), value.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl KeyValueStore for MemoryKvStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        if let Some(quota) = self.quota {
            if value.len() > quota {
                bail!("quota exceeded: {} bytes for '{key}', limit is {quota}", value.len());
            }
        }
        self.insert_raw(key, value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.entries().remove(key);
        Ok(())
    }
}
