// src/ingest/providers/rss.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::ingest::http::{build_client, fetch_text};
use crate::ingest::types::{FeedProvider, FeedSource, RawFeedItem};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    guid: Option<Guid>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

// <guid isPermaLink="false">…</guid>: attributes are ignored, text kept.
#[derive(Debug, Deserialize)]
struct Guid {
    #[serde(rename = "$text", default)]
    value: Option<String>,
}

/// Parse an RSS 2.0 document into raw items.
pub fn parse_rss(xml: &str) -> Result<Vec<RawFeedItem>> {
    let xml_clean = scrub_html_entities_for_xml(xml);
    let rss: Rss = from_str(&xml_clean).context("parsing rss xml")?;
    Ok(rss
        .channel
        .item
        .into_iter()
        .map(|it| RawFeedItem {
            title: it.title.map(|s| s.trim().to_string()),
            link: it.link.map(|s| s.trim().to_string()),
            guid: it.guid.and_then(|g| g.value).map(|s| s.trim().to_string()),
            pub_date: it.pub_date,
            description: it.description,
        })
        .collect())
}

/// Live provider: HTTP GET with a 10s timeout, then RSS parsing.
pub struct RssProvider {
    client: reqwest::Client,
}

impl RssProvider {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: build_client()?,
        })
    }
}

#[async_trait]
impl FeedProvider for RssProvider {
    async fn fetch_items(&self, source: &FeedSource) -> Result<Vec<RawFeedItem>> {
        let body = fetch_text(&self.client, &source.url).await?;
        parse_rss(&body).with_context(|| format!("source {}", source.id))
    }

    fn name(&self) -> &'static str {
        "rss"
    }
}

// XML only knows five named entities; feeds routinely embed HTML ones.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
        .replace("&hellip;", "...")
}
