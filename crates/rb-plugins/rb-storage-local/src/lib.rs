//! # rb-storage-local
//! rusty-board/crates/rb-storage-local/src/lib.rs
//! Local filesystem implementation of `KeyValueStore`, plus the in-memory
//! session store behind transient image handles.
//! Features: one file per key, atomic replacement on write.

mod session;

pub use session::SessionImageStore;

use anyhow::Context;
use async_trait::async_trait;
use rb_core::traits::KeyValueStore;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;

pub struct LocalKvStore {
    /// Directory holding one `<key>.json` file per key (e.g., "./data")
    root_path: PathBuf,
}

impl LocalKvStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root_path: root }
    }

    /// Maps a key to its file. Bytes outside `[A-Za-z0-9_-]` are written as
    /// `%XX`, so a key can never escape the root directory and distinct keys
    /// never share a file.
    fn key_path(&self, key: &str) -> PathBuf {
        let name: String = key
            .bytes()
            .map(|b| {
                if b.is_ascii_alphanumeric() || b == b'-' || b == b'_' {
                    char::from(b).to_string()
                } else {
                    format!("%{b:02X}")
                }
            })
            .collect();
        self.root_path.join(format!("{name}.json"))
    }
}

#[async_trait]
impl KeyValueStore for LocalKvStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.key_path(key);
        match fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("reading {}", path.display())),
        }
    }

    /// Writes to a sibling temp file and renames it over the target, so a
    /// crash mid-write leaves the previous value intact.
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        fs::create_dir_all(&self.root_path)
            .await
            .with_context(|| format!("creating {}", self.root_path.display()))?;

        let target = self.key_path(key);
        let staging = target.with_extension("json.tmp");
        fs::write(&staging, value)
            .await
            .with_context(|| format!("writing {}", staging.display()))?;
        fs::rename(&staging, &target)
            .await
            .with_context(|| format!("replacing {}", target.display()))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        let path = self.key_path(key);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("removing {}", path.display())),
        }
    }
}
