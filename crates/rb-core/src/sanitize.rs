//! # Load-time coercion
//!
//! Turns whatever JSON sits under the storage key into typed records.
//! Every JSON object is coerced into a well-formed `Thread`/`Reply`; anything
//! that is not an object is dropped. Nothing is partially passed through.
//!
//! Field defaults:
//! - `id`: numbers are stringified; otherwise a freshly generated id
//! - `timestamp`: RFC 3339 string or epoch milliseconds, kept at millisecond
//!   precision; otherwise the Unix epoch
//! - `text`: `""`
//! - `imageUrl`: `None`, also for inline `data:image/` payloads
//! - `views`: `0` unless already a non-negative number
//! - `replies`: `[]`
//!
//! `displayImageUrl` is never read.

use chrono::{DateTime, SubsecRound, Utc};
use serde_json::{Map, Value};

use crate::ids::generate_id;
use crate::models::{is_inline_image, Reply, Thread};

/// Parses a stored collection. Only a JSON syntax error is an `Err`;
/// shape problems are repaired, or dropped for non-object entries.
pub fn parse_collection(raw: &str) -> serde_json::Result<Vec<Thread>> {
    let value: Value = serde_json::from_str(raw)?;
    Ok(sanitize_collection(&value))
}

pub fn sanitize_collection(value: &Value) -> Vec<Thread> {
    let Value::Array(entries) = value else {
        log::warn!("stored posts are not an array, starting with an empty collection");
        return Vec::new();
    };

    let threads: Vec<Thread> = entries.iter().filter_map(thread_from_value).collect();
    if threads.len() < entries.len() {
        log::warn!(
            "dropped {} non-object thread entries while loading",
            entries.len() - threads.len()
        );
    }
    threads
}

pub fn thread_from_value(value: &Value) -> Option<Thread> {
    let fields = value.as_object()?;
    let replies = match fields.get("replies") {
        Some(Value::Array(items)) => items.iter().filter_map(reply_from_value).collect(),
        _ => Vec::new(),
    };

    Some(Thread {
        id: id(fields),
        timestamp: timestamp(fields),
        text: text(fields),
        image_url: durable_image_url(fields),
        display_image_url: None,
        views: views(fields.get("views")),
        replies,
    })
}

pub fn reply_from_value(value: &Value) -> Option<Reply> {
    let fields = value.as_object()?;

    Some(Reply {
        id: id(fields),
        timestamp: timestamp(fields),
        text: text(fields),
        image_url: durable_image_url(fields),
        display_image_url: None,
    })
}

fn id(fields: &Map<String, Value>) -> String {
    match fields.get("id") {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => generate_id(),
    }
}

// Saved timestamps carry milliseconds; finer precision is cut on load.
fn timestamp(fields: &Map<String, Value>) -> DateTime<Utc> {
    let parsed = match fields.get("timestamp") {
        Some(Value::String(raw)) => DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|ts| ts.with_timezone(&Utc)),
        Some(Value::Number(n)) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    };
    parsed.unwrap_or_default().trunc_subsecs(3)
}

fn text(fields: &Map<String, Value>) -> String {
    fields
        .get("text")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn durable_image_url(fields: &Map<String, Value>) -> Option<String> {
    fields
        .get("imageUrl")
        .and_then(Value::as_str)
        .filter(|url| !is_inline_image(url))
        .map(str::to_string)
}

// Strings are replaced, not parsed: `"3"` becomes 0.
fn views(value: Option<&Value>) -> u64 {
    let Some(Value::Number(n)) = value else {
        return 0;
    };
    n.as_u64()
        .or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f as u64)
        })
        .unwrap_or(0)
}
