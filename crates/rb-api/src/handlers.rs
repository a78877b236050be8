//! # rb-api Handlers
//!
//! This module coordinates the flow between user actions and the board:
//! validate, mutate, persist, re-render.

use rb_core::error::{AppError, Result};
use rb_core::models::{ImageUpload, Reply, Thread};

use crate::board::{Board, Page, View};

pub const THREAD_NOTICE: &str = "Please enter some text or upload an image to start a thread.";
pub const REPLY_NOTICE: &str = "Please enter some text or upload an image for your reply.";

/// What the posting form hands over.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub text: String,
    pub image: Option<ImageUpload>,
}

impl Submission {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image: None,
        }
    }

    /// Trimmed text, or the notice when there is neither text nor image.
    fn validate(self, notice: &str) -> Result<(String, Option<ImageUpload>)> {
        let text = self.text.trim().to_string();
        if text.is_empty() && self.image.is_none() {
            return Err(AppError::ValidationError(notice.to_string()));
        }
        Ok((text, self.image))
    }
}

/// Starts a new thread and returns its id. The caller re-renders the
/// current view with `Board::refresh`.
pub async fn submit_thread(board: &mut Board, submission: Submission) -> Result<String> {
    let (text, image) = submission.validate(THREAD_NOTICE)?;
    let display_image_url = board.attach_image(image)?;

    let thread = Thread::new(text, display_image_url);
    let id = thread.id.clone();
    board.mutate(|threads| threads.push(thread)).await;

    log::info!("created thread {id}");
    Ok(id)
}

/// Appends a reply to `thread_id` and returns the reply id.
pub async fn submit_reply(board: &mut Board, thread_id: &str, submission: Submission) -> Result<String> {
    let (text, image) = submission.validate(REPLY_NOTICE)?;
    if board.thread(thread_id).is_none() {
        return Err(AppError::NotFound("Thread".to_string(), thread_id.to_string()));
    }
    let display_image_url = board.attach_image(image)?;

    let reply = Reply::new(text, display_image_url);
    let id = reply.id.clone();
    board
        .mutate(|threads| {
            if let Some(thread) = threads.iter_mut().find(|thread| thread.id == thread_id) {
                thread.replies.push(reply);
            }
        })
        .await;

    log::info!("created reply {id} in thread {thread_id}");
    Ok(id)
}

/// Switches views. Transient images are dropped first, so a view only shows
/// images posted since the last switch.
pub async fn navigate(board: &mut Board, view: View) -> Result<Page> {
    board.clear_transient_images();
    board.show_view(view, None).await
}

/// Jumps from a catalog entry to its thread in the thread list, which is
/// marked for highlighting. An unknown id still lands on the thread list.
pub async fn open_catalog_item(board: &mut Board, thread_id: &str) -> Result<Page> {
    board.clear_transient_images();
    let highlight = board.thread(thread_id).map(|_| thread_id);
    if highlight.is_none() {
        log::warn!("catalog entry {thread_id} has no matching thread");
    }
    board.show_view(View::Threads, highlight).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use rb_core::{ImageHandleStore, MemoryKvStore, PostStore, STORAGE_KEY};
    use rb_storage_local::SessionImageStore;
    use std::sync::Arc;

    struct Fixture {
        kv: Arc<MemoryKvStore>,
        images: Arc<SessionImageStore>,
        board: Board,
    }

    async fn fixture_with(kv: Arc<MemoryKvStore>) -> Fixture {
        let images = Arc::new(SessionImageStore::new());
        let board = Board::open(PostStore::new(kv.clone()), images.clone()).await;
        Fixture { kv, images, board }
    }

    async fn fixture() -> Fixture {
        fixture_with(Arc::new(MemoryKvStore::new())).await
    }

    fn image() -> ImageUpload {
        ImageUpload {
            file_name: "frog.jpg".into(),
            content_type: "image/jpeg".into(),
            bytes: vec![0xFF, 0xD8, 0xFF],
        }
    }

    fn with_image(text: &str) -> Submission {
        Submission {
            text: text.into(),
            image: Some(image()),
        }
    }

    async fn reload(kv: &Arc<MemoryKvStore>) -> Vec<Thread> {
        PostStore::new(kv.clone()).load().await
    }

    #[tokio::test]
    async fn test_hello_thread_then_view_once() {
        let mut fx = fixture().await;

        let id = submit_thread(&mut fx.board, Submission::text("hello")).await.unwrap();

        let threads = fx.board.threads();
        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].id, id);
        assert_eq!(threads[0].text, "hello");
        assert_eq!(threads[0].views, 0);
        assert!(threads[0].replies.is_empty());
        assert_eq!(threads[0].image_url, None);

        let stored: serde_json::Value =
            serde_json::from_str(&fx.kv.raw(STORAGE_KEY).unwrap()).unwrap();
        assert_eq!(stored[0]["imageUrl"], serde_json::Value::Null);
        assert_eq!(stored[0]["views"], 0);

        let page = navigate(&mut fx.board, View::Threads).await.unwrap();
        assert_eq!(page.view, View::Threads);
        assert!(page.html.contains("hello"));
        assert_eq!(fx.board.threads()[0].views, 1);
        assert_eq!(reload(&fx.kv).await[0].views, 1);
    }

    #[tokio::test]
    async fn test_empty_submissions_are_rejected() {
        let mut fx = fixture().await;

        let err = submit_thread(&mut fx.board, Submission::text("   \n")).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(ref msg) if msg == THREAD_NOTICE));
        assert!(fx.board.threads().is_empty());
        assert_eq!(fx.kv.raw(STORAGE_KEY), None);

        let id = submit_thread(&mut fx.board, Submission::text("op")).await.unwrap();
        let err = submit_reply(&mut fx.board, &id, Submission::default()).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(ref msg) if msg == REPLY_NOTICE));
        assert!(fx.board.threads()[0].replies.is_empty());
    }

    #[tokio::test]
    async fn test_text_is_trimmed() {
        let mut fx = fixture().await;
        submit_thread(&mut fx.board, Submission::text("  padded  ")).await.unwrap();
        assert_eq!(fx.board.threads()[0].text, "padded");
    }

    #[tokio::test]
    async fn test_image_only_thread_keeps_handle_out_of_storage() {
        let mut fx = fixture().await;

        submit_thread(&mut fx.board, with_image("")).await.unwrap();
        let handle = fx.board.threads()[0].display_image_url.clone().unwrap();
        assert_eq!(fx.images.resolve(&handle), Some(image()));
        assert_eq!(fx.board.threads()[0].text, "");

        let raw = fx.kv.raw(STORAGE_KEY).unwrap();
        assert!(!raw.contains(&handle));
        assert!(!raw.contains("displayImageUrl"));

        let page = fx.board.refresh().await.unwrap();
        let uuid = handle.rsplit('/').next().unwrap();
        assert!(page.html.contains(uuid));
    }

    #[tokio::test]
    async fn test_navigation_releases_transient_images() {
        let mut fx = fixture().await;
        let id = submit_thread(&mut fx.board, with_image("pic")).await.unwrap();
        submit_reply(&mut fx.board, &id, with_image("pic reply")).await.unwrap();
        assert_eq!(fx.images.live_handles(), 2);

        let page = navigate(&mut fx.board, View::Catalog).await.unwrap();
        assert_eq!(page.view, View::Catalog);
        assert_eq!(fx.images.live_handles(), 0);
        assert!(!page.html.contains("blob:"));
        assert_eq!(fx.board.threads()[0].display_image_url, None);
        assert_eq!(fx.board.threads()[0].replies[0].display_image_url, None);
        assert_eq!(fx.board.clear_transient_images(), 0);
    }

    #[tokio::test]
    async fn test_replies_append_in_order_without_counting_views() {
        let mut fx = fixture().await;
        let id = submit_thread(&mut fx.board, Submission::text("op")).await.unwrap();

        let first = submit_reply(&mut fx.board, &id, Submission::text("one")).await.unwrap();
        let second = submit_reply(&mut fx.board, &id, Submission::text("two")).await.unwrap();

        let stored = reload(&fx.kv).await;
        let ids: Vec<_> = stored[0].replies.iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, vec![first, second]);
        assert_eq!(stored[0].views, 0);
    }

    #[tokio::test]
    async fn test_reply_render_shows_reply_without_counting_views() {
        let mut fx = fixture().await;
        let id = submit_thread(&mut fx.board, Submission::text("op")).await.unwrap();
        fx.board.refresh().await.unwrap();
        assert_eq!(fx.board.threads()[0].views, 1);

        submit_reply(&mut fx.board, &id, Submission::text("fresh reply")).await.unwrap();
        let page = fx.board.render(fx.board.current_view(), None).unwrap();

        assert_eq!(page.view, View::Threads);
        assert!(page.html.contains("fresh reply"));
        assert_eq!(fx.board.threads()[0].views, 1);
        assert_eq!(reload(&fx.kv).await[0].views, 1);
    }

    #[tokio::test]
    async fn test_reply_to_unknown_thread() {
        let mut fx = fixture().await;
        let err = submit_reply(&mut fx.board, "0-0", with_image("lost")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_, ref id) if id == "0-0"));
        assert_eq!(fx.images.live_handles(), 0);
    }

    #[tokio::test]
    async fn test_catalog_does_not_count_views() {
        let mut fx = fixture().await;
        submit_thread(&mut fx.board, Submission::text("quiet")).await.unwrap();

        navigate(&mut fx.board, View::Catalog).await.unwrap();
        let page = fx.board.refresh().await.unwrap();
        assert_eq!(page.view, View::Catalog);
        assert_eq!(fx.board.threads()[0].views, 0);
    }

    #[tokio::test]
    async fn test_open_catalog_item_highlights_thread() {
        let mut fx = fixture().await;
        let target = submit_thread(&mut fx.board, with_image("target")).await.unwrap();
        submit_thread(&mut fx.board, Submission::text("other")).await.unwrap();
        navigate(&mut fx.board, View::Catalog).await.unwrap();
        submit_thread(&mut fx.board, with_image("fresh")).await.unwrap();

        let page = open_catalog_item(&mut fx.board, &target).await.unwrap();
        assert_eq!(page.view, View::Threads);
        assert_eq!(fx.board.current_view(), View::Threads);
        assert!(page.html.contains("thread highlight"));
        assert!(page.html.contains(&format!("id=\"thread-{target}\"")));
        assert_eq!(fx.images.live_handles(), 0);
        assert!(fx.board.threads().iter().all(|t| t.views == 1));

        let page = open_catalog_item(&mut fx.board, "missing").await.unwrap();
        assert!(!page.html.contains("thread highlight"));
    }

    #[tokio::test]
    async fn test_failed_save_keeps_session_state() {
        let mut fx = fixture_with(Arc::new(MemoryKvStore::with_quota(8))).await;

        submit_thread(&mut fx.board, Submission::text("too big to store")).await.unwrap();
        assert_eq!(fx.board.threads().len(), 1);
        assert_eq!(fx.kv.raw(STORAGE_KEY), None);
    }

    #[tokio::test]
    async fn test_reopen_restores_collection_without_images() {
        let kv = Arc::new(MemoryKvStore::new());
        let mut fx = fixture_with(kv.clone()).await;
        let id = submit_thread(&mut fx.board, with_image("survives")).await.unwrap();
        let images = fx.images.clone();
        fx.board.close();
        assert_eq!(images.live_handles(), 0);

        let reopened = fixture_with(kv).await;
        let thread = reopened.board.thread(&id).unwrap();
        assert_eq!(thread.text, "survives");
        assert_eq!(thread.display_image_url, None);
        assert_eq!(thread.image_src(), None);
    }

    #[tokio::test]
    async fn test_corrupted_store_opens_empty() {
        let kv = Arc::new(MemoryKvStore::new());
        kv.insert_raw(STORAGE_KEY, "not json{");

        let fx = fixture_with(kv).await;
        assert!(fx.board.threads().is_empty());
        assert_eq!(fx.kv.raw(STORAGE_KEY), None);
    }
}
