// src/ingest/events.rs
use anyhow::Result;

use crate::config::DataPaths;
use crate::ingest::config::EventSource;
use crate::ingest::types::{FeedProvider, RawFeedItem};
use crate::ingest::{
    collect_from_sources, dedupe_by_url, generate_id_from_url, feed_title, normalize_published_at,
    now_rfc3339, sort_by_date_desc,
};
use crate::models::EventItem;
use crate::store;

fn to_event(src: &EventSource, raw: &RawFeedItem, now: &str) -> Option<EventItem> {
    let url = raw.canonical_url()?;
    let title = feed_title(raw.title.as_deref().unwrap_or_default());
    if title.is_empty() {
        return None;
    }
    Some(EventItem {
        id: generate_id_from_url(url),
        title,
        start: normalize_published_at(raw.pub_date.as_deref(), now),
        end: None,
        location: None,
        organizer: Some(src.feed.name.clone()),
        source_url: url.to_string(),
        category: src.category,
    })
}

pub async fn ingest_events(provider: &dyn FeedProvider, sources: &[EventSource]) -> Vec<EventItem> {
    let now = now_rfc3339();
    let events = collect_from_sources("events", provider, sources, |src, raw| to_event(src, raw, &now)).await;
    sort_by_date_desc(dedupe_by_url(events))
}

/// Ingest and write `events.json`.
pub async fn run(provider: &dyn FeedProvider, sources: &[EventSource], paths: &DataPaths) -> Result<Vec<EventItem>> {
    tracing::info!(target: "ingest", sources = sources.len(), "starting events ingestion");
    let events = ingest_events(provider, sources).await;
    store::write_json_pretty(&paths.events(), &events)?;
    tracing::info!(target: "ingest", count = events.len(), path = %paths.events().display(), "wrote events snapshot");
    Ok(events)
}
