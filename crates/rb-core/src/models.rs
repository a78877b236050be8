//! # Domain Models
//!
//! Threads and replies as they live in memory and in the persisted collection.
//! The only field that never crosses the persistence boundary is
//! `display_image_url`, which holds a session-scoped image handle.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Serialize, Serializer};

use crate::ids::generate_id;

/// Prefix of inline image payloads (`data:image/png;base64,...`).
/// Values carrying it are never allowed to persist.
pub const INLINE_IMAGE_PREFIX: &str = "data:image/";

/// A top-level post with its replies in arrival order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub id: String,
    #[serde(serialize_with = "serialize_iso")]
    pub timestamp: DateTime<Utc>,
    pub text: String,
    /// Durable image reference. `None` for everything posted locally.
    pub image_url: Option<String>,
    #[serde(skip)]
    pub display_image_url: Option<String>,
    /// Bumped each time the thread list renders this thread
    pub views: u64,
    pub replies: Vec<Reply>,
}

/// A post attached to exactly one thread.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: String,
    #[serde(serialize_with = "serialize_iso")]
    pub timestamp: DateTime<Utc>,
    pub text: String,
    pub image_url: Option<String>,
    #[serde(skip)]
    pub display_image_url: Option<String>,
}

/// A user-selected image file, before it is turned into a transient handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Thread {
    pub fn new(text: impl Into<String>, display_image_url: Option<String>) -> Self {
        Self {
            id: generate_id(),
            timestamp: now_millis(),
            text: text.into(),
            image_url: None,
            display_image_url,
            views: 0,
            replies: Vec::new(),
        }
    }

    /// The source a renderer should show: the session handle first, then
    /// the durable reference.
    pub fn image_src(&self) -> Option<&str> {
        preferred_image(&self.display_image_url, &self.image_url)
    }

    /// Takes every transient handle out of this thread and its replies.
    /// Each handle is handed out once; a second call returns nothing.
    pub fn take_display_handles(&mut self) -> Vec<String> {
        let mut handles: Vec<String> = self.display_image_url.take().into_iter().collect();
        handles.extend(
            self.replies
                .iter_mut()
                .filter_map(|reply| reply.display_image_url.take()),
        );
        handles
    }
}

impl Reply {
    pub fn new(text: impl Into<String>, display_image_url: Option<String>) -> Self {
        Self {
            id: generate_id(),
            timestamp: now_millis(),
            text: text.into(),
            image_url: None,
            display_image_url,
        }
    }

    pub fn image_src(&self) -> Option<&str> {
        preferred_image(&self.display_image_url, &self.image_url)
    }
}

/// True when `url` embeds image bytes instead of pointing at them.
pub fn is_inline_image(url: &str) -> bool {
    url.starts_with(INLINE_IMAGE_PREFIX)
}

/// Current time at the millisecond precision the store keeps.
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

fn preferred_image<'a>(transient: &'a Option<String>, durable: &'a Option<String>) -> Option<&'a str> {
    transient.as_deref().or(durable.as_deref())
}

fn serialize_iso<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}
