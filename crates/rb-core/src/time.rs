//! Display formatting for post timestamps.
//!
//! Stored timestamps stay RFC 3339; this only shapes what a reader sees.

use chrono::{DateTime, Local, TimeZone, Utc};

const DISPLAY_FORMAT: &str = "%d/%m/%y %H:%M:%S";

/// Formats in the machine's local zone, e.g. `16/10/26 14:03:09`.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    format_timestamp_in(ts, &Local)
}

pub fn format_timestamp_in<Tz: TimeZone>(ts: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    ts.with_timezone(tz).format(DISPLAY_FORMAT).to_string()
}
