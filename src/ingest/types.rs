// src/ingest/types.rs
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// One item as published by a feed, before normalization. Every field is
/// optional because real feeds omit any of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFeedItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub guid: Option<String>,
    pub pub_date: Option<String>,
    pub description: Option<String>,
}

impl RawFeedItem {
    /// `link`, else `guid`; blank values do not count.
    pub fn canonical_url(&self) -> Option<&str> {
        [self.link.as_deref(), self.guid.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
    }
}

/// A named external feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedSource {
    pub id: String,
    pub name: String,
    #[serde(alias = "feedUrl", alias = "feed_url")]
    pub url: String,
}

impl FeedSource {
    pub fn new(id: &str, name: &str, url: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            url: url.to_string(),
        }
    }
}

impl AsRef<FeedSource> for FeedSource {
    fn as_ref(&self) -> &FeedSource {
        self
    }
}

/// Feed-fetch capability. Implementations fetch and parse; the pipeline only
/// sees typed items.
#[async_trait::async_trait]
pub trait FeedProvider: Send + Sync {
    async fn fetch_items(&self, source: &FeedSource) -> Result<Vec<RawFeedItem>>;
    fn name(&self) -> &'static str;
}
