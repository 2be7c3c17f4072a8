// tests/ingest_pipeline.rs
//
// End-to-end ingestion over offline providers: one source fails, the rest
// still land in sorted, deduplicated buckets and snapshots.

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::PathBuf;

use oneida_news_hub::config::DataPaths;
use oneida_news_hub::ingest::config::{NewsSource, PoliceFeedKind, PoliceSource};
use oneida_news_hub::ingest::providers::fixture::FixtureProvider;
use oneida_news_hub::ingest::types::{FeedProvider, FeedSource, RawFeedItem};
use oneida_news_hub::ingest::{news, obits, police};
use oneida_news_hub::models::{NewsBuckets, NewsCategory};

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn news_source(id: &str, category: NewsCategory) -> NewsSource {
    NewsSource {
        feed: FeedSource::new(id, &format!("{id} name"), &format!("https://{id}.test/rss")),
        category,
    }
}

/// Serves canned items and fails for sources whose id starts with "down".
struct FlakyProvider;

#[async_trait]
impl FeedProvider for FlakyProvider {
    async fn fetch_items(&self, source: &FeedSource) -> Result<Vec<RawFeedItem>> {
        if source.id.starts_with("down") {
            bail!("HTTP 503: Service Unavailable");
        }
        let item = |n: u32, day: u32| RawFeedItem {
            title: Some(format!("{} story {n}", source.id)),
            link: Some(format!("https://shared.test/{n}")),
            guid: None,
            pub_date: Some(format!("2025-11-{day:02}T12:00:00Z")),
            description: None,
        };
        Ok(vec![item(1, 18), item(2, 20), item(3, 19)])
    }

    fn name(&self) -> &'static str {
        "flaky"
    }
}

#[tokio::test]
async fn failing_source_is_isolated() {
    let sources = vec![
        news_source("alpha", NewsCategory::Local),
        news_source("down-1", NewsCategory::Local),
        news_source("beta", NewsCategory::Local),
    ];
    let buckets = news::ingest_news(&FlakyProvider, &sources).await;

    let local = &buckets.local_news;
    // alpha and beta publish the same three URLs; alpha was first.
    assert_eq!(local.len(), 3);
    assert!(local.iter().all(|n| n.title.starts_with("alpha")));
    assert!(local.iter().all(|n| !n.source_name.starts_with("down")));

    let urls: HashSet<_> = local.iter().map(|n| n.source_url.as_str()).collect();
    assert_eq!(urls.len(), local.len());

    let dates: Vec<_> = local.iter().map(|n| n.published_at.as_str()).collect();
    assert_eq!(
        dates,
        vec!["2025-11-20T12:00:00Z", "2025-11-19T12:00:00Z", "2025-11-18T12:00:00Z"]
    );
    assert!(buckets.regional_news.is_empty());
}

#[tokio::test]
async fn all_sources_failing_yields_empty_bucket() {
    let sources = vec![news_source("down-a", NewsCategory::Gov), news_source("down-b", NewsCategory::Gov)];
    let buckets = news::ingest_news(&FlakyProvider, &sources).await;
    assert!(buckets.is_empty());
}

#[tokio::test]
async fn fixture_dir_run_writes_news_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DataPaths::new(dir.path());
    let provider = FixtureProvider::from_dir(fixtures());
    let sources = vec![
        news_source("wktv-local", NewsCategory::Local),
        news_source("missing-feed", NewsCategory::Local),
        news_source("npr-national", NewsCategory::National),
    ];

    let buckets = news::run(&provider, &sources, &paths).await.unwrap();

    let local: Vec<_> = buckets.local_news.iter().map(|n| n.source_url.as_str()).collect();
    assert_eq!(local, vec!["https://wktv.test/news/crash", "https://wktv.test/news/rome-budget"]);
    assert_eq!(buckets.local_news[0].title, "Utica Police investigate Genesee Street crash");
    assert_eq!(buckets.local_news[1].title, "Rome school board approves budget - vote set");
    assert_eq!(
        buckets.local_news[0].tags.as_deref(),
        Some(&["Utica".to_string(), "Police".to_string()][..])
    );
    assert_eq!(buckets.national_news.len(), 1);

    let raw = std::fs::read_to_string(paths.news()).unwrap();
    let on_disk: NewsBuckets = serde_json::from_str(&raw).unwrap();
    assert_eq!(on_disk, buckets);
    assert!(raw.contains("\"localNews\""));
}

#[tokio::test]
async fn obits_and_police_from_fixtures() {
    let provider = FixtureProvider::from_dir(fixtures());

    let obits = obits::ingest_obits(
        &provider,
        &[FeedSource::new("legacy-utica", "Legacy", "https://legacy.test/rss")],
    )
    .await;
    assert_eq!(obits.len(), 2);
    assert_eq!(obits[0].name, "Joseph Romano");
    assert_eq!(obits[1].name, "Mary Ellen Kowalski");
    assert_eq!(obits[1].age, Some(85));
    assert_eq!(obits[1].city.as_deref(), Some("Utica"));

    let sources = vec![
        PoliceSource {
            feed: FeedSource::new("oneida-911", "Oneida County 911", "https://911.test/rss"),
            kind: PoliceFeedKind::Calls,
        },
        PoliceSource {
            feed: FeedSource::new("utica-pd-releases", "Utica PD", "https://uticapd.test/rss"),
            kind: PoliceFeedKind::Releases,
        },
    ];
    let data = police::ingest_police(&provider, &sources).await;
    assert_eq!(data.calls.len(), 2);
    assert_eq!(data.calls[0].description, "Structure fire - Whitesboro");
    assert_eq!(data.calls[0].agency.as_deref(), Some("Oneida County 911"));
    assert!(data.calls[0].source_url.is_none());
    assert_ne!(data.calls[0].id, data.calls[1].id);

    assert_eq!(data.releases.len(), 1);
    assert_eq!(data.releases[0].summary, "Officers arrested a 34-year-old man on Wednesday.");
}
