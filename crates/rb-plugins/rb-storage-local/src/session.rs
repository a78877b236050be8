//! Transient image handles.
//!
//! Uploaded images stay in process memory for the session and are addressed
//! by `blob:rusty-board/<uuid>` handles. Nothing here touches disk.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use rb_core::models::ImageUpload;
use rb_core::traits::ImageHandleStore;
use uuid::Uuid;

const HANDLE_PREFIX: &str = "blob:rusty-board/";

#[derive(Default)]
pub struct SessionImageStore {
    blobs: Mutex<HashMap<String, ImageUpload>>,
}

impl SessionImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn blobs(&self) -> MutexGuard<'_, HashMap<String, ImageUpload>> {
        self.blobs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ImageHandleStore for SessionImageStore {
    fn acquire(&self, image: ImageUpload) -> anyhow::Result<String> {
        anyhow::ensure!(!image.bytes.is_empty(), "image '{}' is empty", image.file_name);

        let handle = format!("{HANDLE_PREFIX}{}", Uuid::new_v4());
        log::debug!(
            "acquired {handle} for {} ({}, {} bytes)",
            image.file_name,
            image.content_type,
            image.bytes.len()
        );
        self.blobs().insert(handle.clone(), image);
        Ok(handle)
    }

    fn resolve(&self, handle: &str) -> Option<ImageUpload> {
        self.blobs().get(handle).cloned()
    }

    fn release(&self, handle: &str) -> bool {
        let released = self.blobs().remove(handle).is_some();
        if released {
            log::debug!("released {handle}");
        } else {
            log::warn!("release of unknown or already released handle {handle}");
        }
        released
    }

    fn live_handles(&self) -> usize {
        self.blobs().len()
    }
}
