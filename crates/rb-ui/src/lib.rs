//! # rb-ui
//!
//! Askama templates for the two board views and the flat view models they
//! render from. Both views list threads newest first.

use askama::Template;
use rb_core::format_timestamp;
use rb_core::models::{Reply, Thread};

/// Catalog snippets longer than this are cut.
const SNIPPET_MAX_CHARS: usize = 100;
const SNIPPET_KEEP_CHARS: usize = 97;

#[derive(Template)]
#[template(path = "threads.html")]
pub struct ThreadListTemplate<'a> {
    pub title: &'a str,
    pub threads_active: bool,
    pub threads: &'a [ThreadView],
}

#[derive(Template)]
#[template(path = "catalog.html")]
pub struct CatalogTemplate<'a> {
    pub title: &'a str,
    pub threads_active: bool,
    pub items: &'a [CatalogItemView],
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThreadView {
    pub id: String,
    pub timestamp: String,
    pub views: u64,
    pub text: String,
    pub has_image: bool,
    pub image_src: String,
    pub highlighted: bool,
    pub replies: Vec<ReplyView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplyView {
    pub id: String,
    pub timestamp: String,
    pub text: String,
    pub has_image: bool,
    pub image_src: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItemView {
    pub id: String,
    pub has_image: bool,
    pub image_src: String,
    pub snippet: String,
}

impl ThreadView {
    fn from_thread(thread: &Thread, highlight: Option<&str>) -> Self {
        Self {
            id: thread.id.clone(),
            timestamp: format_timestamp(&thread.timestamp),
            views: thread.views,
            text: thread.text.clone(),
            has_image: thread.image_src().is_some(),
            image_src: thread.image_src().unwrap_or_default().to_string(),
            highlighted: highlight == Some(thread.id.as_str()),
            replies: thread.replies.iter().map(ReplyView::from_reply).collect(),
        }
    }
}

impl ReplyView {
    fn from_reply(reply: &Reply) -> Self {
        Self {
            id: reply.id.clone(),
            timestamp: format_timestamp(&reply.timestamp),
            text: reply.text.clone(),
            has_image: reply.image_src().is_some(),
            image_src: reply.image_src().unwrap_or_default().to_string(),
        }
    }
}

/// Thread list view models, newest first, with `highlight` marking the
/// thread a catalog click jumped to.
pub fn thread_views(threads: &[Thread], highlight: Option<&str>) -> Vec<ThreadView> {
    threads
        .iter()
        .rev()
        .map(|thread| ThreadView::from_thread(thread, highlight))
        .collect()
}

pub fn catalog_items(threads: &[Thread]) -> Vec<CatalogItemView> {
    threads
        .iter()
        .rev()
        .map(|thread| CatalogItemView {
            id: thread.id.clone(),
            has_image: thread.image_src().is_some(),
            image_src: thread.image_src().unwrap_or_default().to_string(),
            snippet: catalog_snippet(&thread.text),
        })
        .collect()
}

/// Cuts text over 100 characters down to 97 plus `...`.
pub fn catalog_snippet(text: &str) -> String {
    if text.chars().count() > SNIPPET_MAX_CHARS {
        let kept: String = text.chars().take(SNIPPET_KEEP_CHARS).collect();
        format!("{kept}...")
    } else {
        text.to_string()
    }
}

pub fn render_thread_list(
    title: &str,
    threads: &[Thread],
    highlight: Option<&str>,
) -> askama::Result<String> {
    let views = thread_views(threads, highlight);
    ThreadListTemplate {
        title,
        threads_active: true,
        threads: &views,
    }
    .render()
}

pub fn render_catalog(title: &str, threads: &[Thread]) -> askama::Result<String> {
    let items = catalog_items(threads);
    CatalogTemplate {
        title,
        threads_active: false,
        items: &items,
    }
    .render()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Vec<Thread> {
        let mut older = Thread::new("older <b>bold</b>", None);
        older.id = "100-1".into();
        older.image_url = Some("https://img.example/old.png".into());
        let mut reply = Reply::new("a reply", Some("blob:rusty-board/r".into()));
        reply.id = "100-2".into();
        older.replies.push(reply);

        let mut newer = Thread::new("x".repeat(120), Some("blob:rusty-board/n".into()));
        newer.id = "200-1".into();
        newer.views = 7;
        vec![older, newer]
    }

    #[test]
    fn snippet_truncates_past_one_hundred_chars() {
        assert_eq!(catalog_snippet("short"), "short");
        let exactly = "y".repeat(100);
        assert_eq!(catalog_snippet(&exactly), exactly);

        let long = catalog_snippet(&"é".repeat(101));
        assert_eq!(long.chars().count(), 100);
        assert!(long.ends_with("..."));
        assert!(long.starts_with(&"é".repeat(97)));
    }

    #[test]
    fn views_are_newest_first() {
        let views = thread_views(&board(), Some("100-1"));
        assert_eq!(views[0].id, "200-1");
        assert_eq!(views[1].id, "100-1");
        assert!(views[1].highlighted);
        assert!(!views[0].highlighted);
    }

    #[test]
    fn image_source_prefers_transient_handle() {
        let views = thread_views(&board(), None);
        assert_eq!(views[0].image_src, "blob:rusty-board/n");
        assert_eq!(views[1].image_src, "https://img.example/old.png");
        assert_eq!(views[1].replies[0].image_src, "blob:rusty-board/r");

        let bare = thread_views(&[Thread::new("no image", None)], None);
        assert!(!bare[0].has_image);
    }

    #[test]
    fn thread_list_renders_escaped_text() {
        let html = render_thread_list("Rusty-Board", &board(), Some("200-1")).unwrap();
        assert!(html.contains(r#"id="thread-200-1""#));
        assert!(html.contains("thread highlight"));
        assert!(html.contains("older &lt;b&gt;bold"));
        assert!(!html.contains("<b>bold"));
        assert!(html.contains(r#"<span class="views-count">7</span>"#));
        assert!(html.contains("a reply"));
        assert!(html.find("thread-200-1") < html.find("thread-100-1"));
    }

    #[test]
    fn catalog_renders_snippets() {
        let html = render_catalog("Rusty-Board", &board()).unwrap();
        assert!(html.contains(&format!("{}...", "x".repeat(97))));
        assert!(!html.contains(&"x".repeat(98)));
        assert!(html.contains(r##"href="#thread-100-1""##));
        assert!(!html.contains("a reply"));
    }
}
