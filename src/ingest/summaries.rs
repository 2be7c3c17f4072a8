// src/ingest/summaries.rs
//! Append-only id -> summary cache maintained across pipeline runs.

use anyhow::Result;
use metrics::counter;
use std::time::Duration;

use crate::config::DataPaths;
use crate::models::{NewsBuckets, SummaryCache};
use crate::store;
use crate::summarize::{summarize_news_item, Summarizer, SummaryInput};

#[derive(Debug, Clone, Copy)]
pub struct MergeOptions {
    /// Pause after every `pause_every` new summaries.
    pub pause_every: usize,
    pub pause: Duration,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            pause_every: 10,
            pause: Duration::from_millis(100),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub total_items: usize,
    pub new: usize,
    pub skipped: usize,
    pub missing_id: usize,
}

/// Summarize every item that has no cache entry yet. Existing entries are never
/// touched, so a repeated run with unchanged news makes no summarizer calls.
pub async fn merge_summaries(
    news: &NewsBuckets,
    cache: &mut SummaryCache,
    summarizer: &dyn Summarizer,
    opts: MergeOptions,
) -> MergeStats {
    let mut stats = MergeStats {
        total_items: news.len(),
        ..MergeStats::default()
    };

    for item in news.iter() {
        if item.id.trim().is_empty() {
            tracing::warn!(target: "summaries", title = %item.title, "skipping item without id");
            stats.missing_id += 1;
            continue;
        }
        if cache.by_id.contains_key(&item.id) {
            stats.skipped += 1;
            continue;
        }

        tracing::debug!(target: "summaries", id = %item.id, source = %item.source_name, "summarizing");
        let input = SummaryInput {
            title: item.title.clone(),
            description: None,
            content: None,
            source_name: Some(item.source_name.clone()),
        };
        let summary = summarize_news_item(summarizer, &input).await;
        cache.by_id.insert(item.id.clone(), summary);
        stats.new += 1;

        if opts.pause_every > 0 && stats.new % opts.pause_every == 0 {
            tracing::info!(target: "summaries", new = stats.new, "progress");
            if !opts.pause.is_zero() {
                tokio::time::sleep(opts.pause).await;
            }
        }
    }

    counter!("summaries_generated_total").increment(stats.new as u64);
    counter!("summaries_skipped_total").increment(stats.skipped as u64);
    stats
}

/// Copy cached summaries onto news items for display. Items already carrying a
/// summary keep it.
pub fn apply_summaries(news: &mut NewsBuckets, cache: &SummaryCache) {
    let buckets = [
        &mut news.local_news,
        &mut news.regional_news,
        &mut news.national_news,
        &mut news.gov_news,
    ];
    for bucket in buckets {
        for item in bucket.iter_mut() {
            if item.summary.is_none() {
                item.summary = cache.by_id.get(&item.id).cloned();
            }
        }
    }
}

/// Read `news.json` and `summaries.json`, merge, write `summaries.json` once.
pub async fn run(paths: &DataPaths, summarizer: &dyn Summarizer, opts: MergeOptions) -> Result<MergeStats> {
    let news: NewsBuckets = store::read_json_or_default(&paths.news());
    let mut cache: SummaryCache = store::read_json_or_default(&paths.summaries());
    tracing::info!(
        target: "summaries",
        items = news.len(),
        cached = cache.by_id.len(),
        provider = summarizer.provider_name(),
        "starting summary merge"
    );

    let stats = merge_summaries(&news, &mut cache, summarizer, opts).await;
    store::write_json_pretty(&paths.summaries(), &cache)?;
    tracing::info!(
        target: "summaries",
        new = stats.new,
        skipped = stats.skipped,
        total = cache.by_id.len(),
        "wrote summaries snapshot"
    );
    Ok(stats)
}
