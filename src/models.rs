//! # Models
//! Canonical record shapes shared by the ingestion pipeline, the ad engine
//! and the JSON API. Field names serialize in camelCase so the snapshots under
//! `data/generated/` stay readable by any front end.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// News bucket an item belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    #[default]
    Local,
    Regional,
    National,
    Gov,
}

impl NewsCategory {
    pub const ALL: [NewsCategory; 4] = [
        NewsCategory::Local,
        NewsCategory::Regional,
        NewsCategory::National,
        NewsCategory::Gov,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NewsCategory::Local => "local",
            NewsCategory::Regional => "regional",
            NewsCategory::National => "national",
            NewsCategory::Gov => "gov",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    /// Content-addressed id, see [`crate::ingest::generate_id_from_url`].
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub source_name: String,
    pub source_url: String,
    /// ISO timestamp (RFC 3339 when the feed date was parsable).
    pub published_at: String,
    pub category: NewsCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Filled post-hoc from the summary cache; absent in fresh snapshots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Shape of `news.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewsBuckets {
    #[serde(default)]
    pub local_news: Vec<NewsItem>,
    #[serde(default)]
    pub regional_news: Vec<NewsItem>,
    #[serde(default)]
    pub national_news: Vec<NewsItem>,
    #[serde(default)]
    pub gov_news: Vec<NewsItem>,
}

impl NewsBuckets {
    pub fn bucket_mut(&mut self, category: NewsCategory) -> &mut Vec<NewsItem> {
        match category {
            NewsCategory::Local => &mut self.local_news,
            NewsCategory::Regional => &mut self.regional_news,
            NewsCategory::National => &mut self.national_news,
            NewsCategory::Gov => &mut self.gov_news,
        }
    }

    pub fn bucket(&self, category: NewsCategory) -> &[NewsItem] {
        match category {
            NewsCategory::Local => &self.local_news,
            NewsCategory::Regional => &self.regional_news,
            NewsCategory::National => &self.national_news,
            NewsCategory::Gov => &self.gov_news,
        }
    }

    /// All items in bucket order: local, regional, national, gov.
    pub fn iter(&self) -> impl Iterator<Item = &NewsItem> {
        NewsCategory::ALL
            .into_iter()
            .flat_map(move |c| self.bucket(c).iter())
    }

    pub fn len(&self) -> usize {
        self.local_news.len() + self.regional_news.len() + self.national_news.len() + self.gov_news.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Obit {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funeral_home: Option<String>,
    pub source_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PoliceCall {
    pub id: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agency: Option<String>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PoliceRelease {
    pub id: String,
    pub title: String,
    pub published_at: String,
    pub summary: String,
    pub source_url: String,
}

/// Shape of `police.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PoliceData {
    #[serde(default)]
    pub calls: Vec<PoliceCall>,
    #[serde(default)]
    pub releases: Vec<PoliceRelease>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Music,
    Sports,
    Festival,
    Community,
    Government,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EventItem {
    pub id: String,
    pub title: String,
    pub start: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<String>,
    pub source_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<EventCategory>,
}

/// Shape of `summaries.json`: news id -> summary text. Entries are only ever added.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SummaryCache {
    #[serde(default)]
    pub by_id: BTreeMap<String, String>,
}

/// Page section an ad may target. `Generic` matches every section.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum AdCategory {
    Home,
    LocalNews,
    RegionalNews,
    NationalNews,
    Sports,
    Weather,
    Obits,
    Police,
    Events,
    Links,
    Generic,
}

/// Slot position on a page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum AdPlacement {
    Header,
    TopOfPage,
    Sidebar,
    Inline,
    BetweenBlocks,
    Footer,
}

impl AdPlacement {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdPlacement::Header => "header",
            AdPlacement::TopOfPage => "topOfPage",
            AdPlacement::Sidebar => "sidebar",
            AdPlacement::Inline => "inline",
            AdPlacement::BetweenBlocks => "betweenBlocks",
            AdPlacement::Footer => "footer",
        }
    }
}

fn default_weight() -> i64 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdCreative {
    pub id: String,
    pub advertiser_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_alt: Option<String>,
    pub target_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_text: Option<String>,
    pub categories: Vec<AdCategory>,
    pub placements: Vec<AdPlacement>,
    #[serde(default = "default_weight")]
    pub weight: i64,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Exclusive upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// Largest weight admin validation accepts; the sampler clamps to it too.
pub const MAX_AD_WEIGHT: i64 = 1_000_000;

impl AdCreative {
    /// Sampling weight clamped to `1..=MAX_AD_WEIGHT`.
    pub fn effective_weight(&self) -> u64 {
        self.weight.clamp(1, MAX_AD_WEIGHT) as u64
    }
}

/// Shape of the `ads.json` override file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AdsFile {
    pub ads: Vec<AdCreative>,
}

/// Shape of `ad-metrics.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AdMetrics {
    #[serde(default)]
    pub impressions_by_ad_id: BTreeMap<String, u64>,
    #[serde(default)]
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn news_buckets_use_camel_case_keys() {
        let json = serde_json::to_value(NewsBuckets::default()).unwrap();
        for key in ["localNews", "regionalNews", "nationalNews", "govNews"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn ad_weight_defaults_to_one() {
        let ad: AdCreative = serde_json::from_str(
            r#"{"id":"a","advertiserName":"A","targetUrl":"https://a.test",
                "categories":["generic"],"placements":["sidebar"],"active":true}"#,
        )
        .unwrap();
        assert_eq!(ad.weight, 1);
        assert_eq!(ad.effective_weight(), 1);
    }

    #[test]
    fn effective_weight_is_clamped_both_ways() {
        let mut ad: AdCreative = serde_json::from_str(
            r#"{"id":"a","advertiserName":"A","targetUrl":"https://a.test",
                "categories":["generic"],"placements":["sidebar"],"active":true}"#,
        )
        .unwrap();
        ad.weight = -3;
        assert_eq!(ad.effective_weight(), 1);
        ad.weight = i64::MAX;
        assert_eq!(ad.effective_weight(), MAX_AD_WEIGHT as u64);
    }

    #[test]
    fn summary_cache_reads_by_id() {
        let cache: SummaryCache = serde_json::from_str(r#"{"byId":{"abc":"text"}}"#).unwrap();
        assert_eq!(cache.by_id.get("abc").map(String::as_str), Some("text"));
    }
}
