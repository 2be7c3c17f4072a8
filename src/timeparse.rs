//! Tolerant timestamp parsing for feed dates and ad windows.
//!
//! Feeds publish RFC 2822 (`pubDate`), snapshots store RFC 3339 and the ad
//! admin tooling writes either a full timestamp or a bare `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate, Utc};

/// Parse RFC 3339, RFC 2822 or a bare date (midnight UTC). `None` when nothing fits.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Sort key for newest-first ordering. Unparsable dates sort as the oldest.
pub fn sort_key(raw: &str) -> DateTime<Utc> {
    parse_timestamp(raw).unwrap_or(DateTime::<Utc>::MIN_UTC)
}
