//! # Board session
//!
//! One `Board` owns the thread collection for a session. Handlers borrow it
//! mutably, so actions are applied one at a time, and every mutation goes
//! through `mutate`, which persists the whole collection afterwards.

use std::sync::Arc;

use rb_core::error::{AppError, Result};
use rb_core::models::{ImageUpload, Thread};
use rb_core::store::PostStore;
use rb_core::traits::ImageHandleStore;

const DEFAULT_TITLE: &str = "Rusty-Board";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Threads,
    Catalog,
}

/// A rendered view.
#[derive(Debug, Clone)]
pub struct Page {
    pub view: View,
    pub html: String,
}

pub struct Board {
    store: PostStore,
    images: Arc<dyn ImageHandleStore>,
    threads: Vec<Thread>,
    current: View,
    title: String,
}

impl Board {
    /// Loads the persisted collection. A corrupted store comes back empty.
    pub async fn open(store: PostStore, images: Arc<dyn ImageHandleStore>) -> Self {
        let threads = store.load().await;
        log::info!("loaded {} threads from '{}'", threads.len(), store.key());
        Self {
            store,
            images,
            threads,
            current: View::Threads,
            title: DEFAULT_TITLE.to_string(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn threads(&self) -> &[Thread] {
        &self.threads
    }

    pub fn thread(&self, id: &str) -> Option<&Thread> {
        self.threads.iter().find(|thread| thread.id == id)
    }

    pub fn current_view(&self) -> View {
        self.current
    }

    /// Applies `f` to the collection, then saves it.
    ///
    /// Persistence is best-effort: a failed save is logged and the in-memory
    /// state is kept, so the session carries on and the next save retries.
    pub async fn mutate<T>(&mut self, f: impl FnOnce(&mut Vec<Thread>) -> T) -> T {
        let out = f(&mut self.threads);
        if let Err(err) = self.store.save(&self.threads).await {
            log::error!("failed to persist {} threads: {err:#}", self.threads.len());
        }
        out
    }

    /// Renders `view` and makes it current. Rendering the thread list counts
    /// as a view of every thread on it, and that count is persisted.
    pub async fn show_view(&mut self, view: View, highlight: Option<&str>) -> Result<Page> {
        self.current = view;
        if view == View::Threads {
            self.mutate(|threads| {
                for thread in threads.iter_mut() {
                    thread.views = thread.views.saturating_add(1);
                }
            })
            .await;
        }
        self.render(view, highlight)
    }

    /// Renders `view` from the current state without counting views, e.g.
    /// to show a new reply in place.
    pub fn render(&self, view: View, highlight: Option<&str>) -> Result<Page> {
        let html = match view {
            View::Threads => rb_ui::render_thread_list(&self.title, &self.threads, highlight),
            View::Catalog => rb_ui::render_catalog(&self.title, &self.threads),
        }
        .map_err(|err| AppError::Internal(format!("template rendering failed: {err}")))?;

        Ok(Page { view, html })
    }

    /// Re-renders whichever view is current.
    pub async fn refresh(&mut self) -> Result<Page> {
        self.show_view(self.current, None).await
    }

    /// Turns an attached file into a transient handle.
    pub(crate) fn attach_image(&self, image: Option<ImageUpload>) -> Result<Option<String>> {
        image
            .map(|image| self.images.acquire(image).map_err(AppError::from))
            .transpose()
    }

    /// Releases every transient image handle held by threads and replies.
    /// Returns how many were released.
    pub fn clear_transient_images(&mut self) -> usize {
        let handles: Vec<String> = self
            .threads
            .iter_mut()
            .flat_map(Thread::take_display_handles)
            .collect();

        handles
            .iter()
            .filter(|handle| self.images.release(handle))
            .count()
    }

    /// Ends the session, releasing any handles still on display.
    pub fn close(self) {
        drop(self);
    }
}

impl Drop for Board {
    fn drop(&mut self) {
        let released = self.clear_transient_images();
        if released > 0 {
            log::debug!("released {released} transient images at session end");
        }
    }
}
