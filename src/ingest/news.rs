// src/ingest/news.rs
use anyhow::Result;

use crate::config::DataPaths;
use crate::ingest::config::NewsSource;
use crate::ingest::types::FeedProvider;
use crate::ingest::{collect_from_sources, dedupe_by_url, now_rfc3339, rss_item_to_news_item, sort_by_date_desc};
use crate::models::{NewsBuckets, NewsCategory};
use crate::store;

/// Fetch every news source, bucket by the source's category, then dedupe and
/// sort each bucket on its own.
pub async fn ingest_news(provider: &dyn FeedProvider, sources: &[NewsSource]) -> NewsBuckets {
    let now = now_rfc3339();
    let items = collect_from_sources("news", provider, sources, |src, raw| {
        rss_item_to_news_item(raw, &src.feed.name, src.category, &now)
    })
    .await;

    let mut buckets = NewsBuckets::default();
    for item in items {
        buckets.bucket_mut(item.category).push(item);
    }
    for category in NewsCategory::ALL {
        let bucket = std::mem::take(buckets.bucket_mut(category));
        *buckets.bucket_mut(category) = sort_by_date_desc(dedupe_by_url(bucket));
    }
    buckets
}

/// Ingest and write `news.json`.
pub async fn run(provider: &dyn FeedProvider, sources: &[NewsSource], paths: &DataPaths) -> Result<NewsBuckets> {
    tracing::info!(target: "ingest", sources = sources.len(), "starting news ingestion");
    let buckets = ingest_news(provider, sources).await;
    store::write_json_pretty(&paths.news(), &buckets)?;
    tracing::info!(
        target: "ingest",
        local = buckets.local_news.len(),
        regional = buckets.regional_news.len(),
        national = buckets.national_news.len(),
        gov = buckets.gov_news.len(),
        path = %paths.news().display(),
        "wrote news snapshot"
    );
    Ok(buckets)
}
