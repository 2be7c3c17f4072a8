// src/ingest/police.rs
use anyhow::Result;

use crate::config::DataPaths;
use crate::ingest::config::{PoliceFeedKind, PoliceSource};
use crate::ingest::types::{FeedProvider, RawFeedItem};
use crate::ingest::{
    collect_from_sources, dedupe_by_url, generate_id_from_url, feed_title, normalize_published_at,
    now_rfc3339, sort_by_date_desc, strip_html,
};
use crate::models::{PoliceCall, PoliceData, PoliceRelease};
use crate::store;
use crate::summarize::{heuristic_summary, SummaryInput};

enum PoliceRecord {
    Call(PoliceCall),
    Release(PoliceRelease),
}

fn to_record(src: &PoliceSource, raw: &RawFeedItem, now: &str) -> Option<PoliceRecord> {
    let raw_title = raw.title.as_deref().unwrap_or_default();
    let title = feed_title(raw_title);
    if title.is_empty() {
        return None;
    }
    let url = raw.canonical_url();
    let at = normalize_published_at(raw.pub_date.as_deref(), now);
    match src.kind {
        // Call logs often have no per-entry link; key those on source + time + text.
        PoliceFeedKind::Calls => {
            let id = match url {
                Some(u) => generate_id_from_url(u),
                None => generate_id_from_url(&format!("{}#{}#{}", src.feed.id, at, title)),
            };
            Some(PoliceRecord::Call(PoliceCall {
                id,
                timestamp: at,
                agency: Some(src.feed.name.clone()),
                description: title,
                location: None,
                source_url: url.map(str::to_string),
            }))
        }
        PoliceFeedKind::Releases => {
            let url = url?;
            let summary = heuristic_summary(&SummaryInput {
                title: title.clone(),
                description: raw.description.as_deref().map(strip_html),
                content: None,
                source_name: Some(src.feed.name.clone()),
            });
            Some(PoliceRecord::Release(PoliceRelease {
                id: generate_id_from_url(url),
                title,
                published_at: at,
                summary,
                source_url: url.to_string(),
            }))
        }
    }
}

pub async fn ingest_police(provider: &dyn FeedProvider, sources: &[PoliceSource]) -> PoliceData {
    let now = now_rfc3339();
    let records = collect_from_sources("police", provider, sources, |src, raw| to_record(src, raw, &now)).await;

    let mut calls = Vec::new();
    let mut releases = Vec::new();
    for r in records {
        match r {
            PoliceRecord::Call(c) => calls.push(c),
            PoliceRecord::Release(r) => releases.push(r),
        }
    }
    PoliceData {
        calls: sort_by_date_desc(dedupe_by_url(calls)),
        releases: sort_by_date_desc(dedupe_by_url(releases)),
    }
}

/// Ingest and write `police.json`.
pub async fn run(provider: &dyn FeedProvider, sources: &[PoliceSource], paths: &DataPaths) -> Result<PoliceData> {
    tracing::info!(target: "ingest", sources = sources.len(), "starting police ingestion");
    let data = ingest_police(provider, sources).await;
    store::write_json_pretty(&paths.police(), &data)?;
    tracing::info!(
        target: "ingest",
        calls = data.calls.len(),
        releases = data.releases.len(),
        path = %paths.police().display(),
        "wrote police snapshot"
    );
    Ok(data)
}
