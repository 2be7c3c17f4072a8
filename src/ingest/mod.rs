// src/ingest/mod.rs
//! Ingestion pipeline: fetch feeds, normalize into canonical records,
//! dedupe by source URL and sort newest first.

pub mod config;
pub mod events;
pub mod http;
pub mod news;
pub mod obits;
pub mod police;
pub mod providers;
pub mod summaries;
pub mod types;

use crate::ingest::types::{FeedProvider, FeedSource, RawFeedItem};
use crate::models::{EventItem, NewsCategory, NewsItem, Obit, PoliceCall, PoliceRelease};
use crate::timeparse;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use sha2::{Digest, Sha256};
use std::cmp::Reverse;
use std::collections::HashSet;

/// Keywords turned into tags when a title mentions them (case-insensitive).
pub const TAG_KEYWORDS: [&str; 8] = [
    "Utica",
    "Rome",
    "Oneida County",
    "Police",
    "School",
    "Health",
    "Road",
    "Crime",
];

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_items_total", "Items kept after normalization, per category.");
        describe_counter!("ingest_source_errors_total", "Source fetch/parse errors.");
        describe_counter!("ingest_dedup_total", "Items removed by URL deduplication.");
        describe_histogram!("ingest_fetch_ms", "Per-source fetch time in milliseconds.");
    });
}

/// Stable short id for a URL: first 6 bytes of SHA-256 over the trimmed,
/// lowercased URL, hex encoded.
pub fn generate_id_from_url(url: &str) -> String {
    let canonical = url.trim().to_lowercase();
    let digest = Sha256::digest(canonical.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Display-safe title: keep only word characters (Unicode), whitespace and
/// hyphens, trimmed, with every whitespace run collapsed to one space.
/// Stripping runs first so a removed character never leaves a double space.
pub fn normalize_title(title: &str) -> String {
    static RE_STRIP: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").expect("strip regex"));
    let stripped = RE_STRIP.replace_all(title, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Title as published in a feed: HTML entities decoded, then [`normalize_title`].
pub fn feed_title(raw: &str) -> String {
    normalize_title(&html_escape::decode_html_entities(raw))
}

/// Plain text from a feed description: entities decoded, tags removed,
/// whitespace collapsed.
pub fn strip_html(html: &str) -> String {
    static RE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag regex"));
    let decoded = html_escape::decode_html_entities(html);
    let text = RE_TAG.replace_all(&decoded, " ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Tags for every keyword the title mentions, in keyword-list order.
pub fn generate_tags_from_title(title: &str) -> Vec<String> {
    let lower = title.to_lowercase();
    TAG_KEYWORDS
        .iter()
        .filter(|kw| lower.contains(&kw.to_lowercase()))
        .map(|kw| kw.to_string())
        .collect()
}

/// Records that can be deduplicated by their source URL.
pub trait HasSourceUrl {
    /// `None` for records without a URL; those are never collapsed.
    fn source_url(&self) -> Option<&str>;
}

/// Records ordered by a timestamp string.
pub trait Dated {
    fn timestamp(&self) -> &str;
}

impl HasSourceUrl for NewsItem {
    fn source_url(&self) -> Option<&str> {
        Some(&self.source_url)
    }
}

impl Dated for NewsItem {
    fn timestamp(&self) -> &str {
        &self.published_at
    }
}

impl HasSourceUrl for EventItem {
    fn source_url(&self) -> Option<&str> {
        Some(&self.source_url)
    }
}

impl Dated for EventItem {
    fn timestamp(&self) -> &str {
        &self.start
    }
}

impl HasSourceUrl for Obit {
    fn source_url(&self) -> Option<&str> {
        Some(&self.source_url)
    }
}

impl Dated for Obit {
    fn timestamp(&self) -> &str {
        &self.date
    }
}

impl HasSourceUrl for PoliceCall {
    fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }
}

impl Dated for PoliceCall {
    fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

impl HasSourceUrl for PoliceRelease {
    fn source_url(&self) -> Option<&str> {
        Some(&self.source_url)
    }
}

impl Dated for PoliceRelease {
    fn timestamp(&self) -> &str {
        &self.published_at
    }
}

/// First occurrence of each source URL wins; relative order is preserved.
pub fn dedupe_by_url<T: HasSourceUrl>(items: Vec<T>) -> Vec<T> {
    let before = items.len();
    let mut seen: HashSet<String> = HashSet::new();
    let kept: Vec<T> = items
        .into_iter()
        .filter(|item| match item.source_url() {
            Some(url) => seen.insert(url.to_string()),
            None => true,
        })
        .collect();
    let removed = before - kept.len();
    if removed > 0 {
        counter!("ingest_dedup_total").increment(removed as u64);
    }
    kept
}

/// Newest first. Stable; unparsable timestamps sort as the oldest.
pub fn sort_by_date_desc<T: Dated>(mut items: Vec<T>) -> Vec<T> {
    items.sort_by_cached_key(|item| Reverse(timeparse::sort_key(item.timestamp())));
    items
}

/// Feed date as RFC 3339 when parsable, verbatim when not, `now` when absent.
pub fn normalize_published_at(pub_date: Option<&str>, now: &str) -> String {
    match pub_date.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => timeparse::parse_timestamp(raw)
            .map(|dt| dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
            .unwrap_or_else(|| raw.to_string()),
        None => now.to_string(),
    }
}

/// Map a raw feed item to a canonical [`NewsItem`]. Items without any URL or
/// with an empty normalized title are dropped.
pub fn rss_item_to_news_item(
    item: &RawFeedItem,
    source_name: &str,
    category: NewsCategory,
    now: &str,
) -> Option<NewsItem> {
    let url = item.canonical_url()?;
    let raw_title = item.title.as_deref().unwrap_or_default();
    let title = feed_title(raw_title);
    if title.is_empty() {
        return None;
    }
    let tags = generate_tags_from_title(raw_title);
    Some(NewsItem {
        id: generate_id_from_url(url),
        title,
        source_name: source_name.to_string(),
        source_url: url.to_string(),
        published_at: normalize_published_at(item.pub_date.as_deref(), now),
        category,
        tags: Some(tags),
        summary: None,
    })
}

/// Current time in the snapshot timestamp format.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

/// Fetch every source in declaration order and map its items. A failing
/// source is logged and contributes nothing; the others still run.
pub async fn collect_from_sources<'s, S, T, F>(
    label: &str,
    provider: &dyn FeedProvider,
    sources: &'s [S],
    mut map: F,
) -> Vec<T>
where
    S: AsRef<FeedSource>,
    F: FnMut(&'s S, &RawFeedItem) -> Option<T>,
{
    ensure_metrics_described();

    let mut out = Vec::new();
    for source in sources {
        let feed = source.as_ref();
        tracing::info!(target: "ingest", category = label, source = %feed.id, url = %feed.url, "fetching source");
        let t0 = std::time::Instant::now();
        match provider.fetch_items(feed).await {
            Ok(items) => {
                histogram!("ingest_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
                let before = out.len();
                out.extend(items.iter().filter_map(|it| map(source, it)));
                tracing::info!(
                    target: "ingest",
                    category = label,
                    source = %feed.id,
                    raw = items.len(),
                    kept = out.len() - before,
                    "source done"
                );
            }
            Err(e) => {
                tracing::warn!(target: "ingest", category = label, source = %feed.id, provider = provider.name(), error = ?e, "source failed; skipping");
                counter!("ingest_source_errors_total").increment(1);
            }
        }
    }
    counter!("ingest_items_total", "category" => label.to_string()).increment(out.len() as u64);
    out
}
