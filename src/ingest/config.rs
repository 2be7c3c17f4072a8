// src/ingest/config.rs
//! Static table of named feed sources per category.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::ingest::types::FeedSource;
use crate::models::{EventCategory, NewsCategory};

pub const ENV_PATH: &str = "INGEST_SOURCES_PATH";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewsSource {
    #[serde(flatten)]
    pub feed: FeedSource,
    #[serde(default)]
    pub category: NewsCategory,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventSource {
    #[serde(flatten)]
    pub feed: FeedSource,
    #[serde(default)]
    pub category: Option<EventCategory>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PoliceFeedKind {
    Calls,
    #[default]
    Releases,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PoliceSource {
    #[serde(flatten)]
    pub feed: FeedSource,
    #[serde(default)]
    pub kind: PoliceFeedKind,
}

impl AsRef<FeedSource> for NewsSource {
    fn as_ref(&self) -> &FeedSource {
        &self.feed
    }
}

impl AsRef<FeedSource> for EventSource {
    fn as_ref(&self) -> &FeedSource {
        &self.feed
    }
}

impl AsRef<FeedSource> for PoliceSource {
    fn as_ref(&self) -> &FeedSource {
        &self.feed
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SourcesConfig {
    #[serde(default)]
    pub news: Vec<NewsSource>,
    #[serde(default)]
    pub events: Vec<EventSource>,
    #[serde(default)]
    pub obits: Vec<FeedSource>,
    #[serde(default)]
    pub police: Vec<PoliceSource>,
}

impl SourcesConfig {
    /// Built-in table used when no config file is present.
    pub fn default_seed() -> Self {
        let news = [
            ("wktv-local", "WKTV NewsChannel 2", "https://www.wktv.com/search/?f=rss&t=article&c=news/local&l=50&s=start_time&sd=desc", NewsCategory::Local),
            ("spectrum-cny", "Spectrum News 1 Central NY", "https://spectrumlocalnews.com/services/contentfeed.nys%7Ccentral-ny%7Cnews.landing.rss", NewsCategory::Regional),
            ("npr-national", "NPR News", "https://feeds.npr.org/1001/rss.xml", NewsCategory::National),
            ("ny-governor", "NY Governor's Office", "https://www.governor.ny.gov/rss.xml", NewsCategory::Gov),
        ]
        .into_iter()
        .map(|(id, name, url, category)| NewsSource {
            feed: FeedSource::new(id, name, url),
            category,
        })
        .collect();

        let events = [
            ("spectrum-sports-cny", "Spectrum News 1 Sports (Central NY)", "https://spectrumlocalnews.com/services/contentfeed.nys%7Ccentral-ny%7Csports.landing.rss", Some(EventCategory::Sports)),
            ("utica-pioneers", "Utica University Pioneers", "https://uticapioneers.com/rss.aspx?path=general", Some(EventCategory::Sports)),
            ("utica-public-library", "Utica Public Library", "https://www.uticapubliclibrary.org/calendar/rss", Some(EventCategory::Community)),
        ]
        .into_iter()
        .map(|(id, name, url, category)| EventSource {
            feed: FeedSource::new(id, name, url),
            category,
        })
        .collect();

        let obits = vec![FeedSource::new(
            "legacy-utica",
            "Legacy.com - Utica Observer-Dispatch",
            "https://www.legacy.com/us/obituaries/uticaod/browse/rss",
        )];

        let police = vec![
            PoliceSource {
                feed: FeedSource::new("oneida-911", "Oneida County 911 Call Log", "https://www.oneidacounty911.com/call-log/rss"),
                kind: PoliceFeedKind::Calls,
            },
            PoliceSource {
                feed: FeedSource::new("utica-pd-releases", "Utica Police Department", "https://www.uticapd.com/press-releases/rss"),
                kind: PoliceFeedKind::Releases,
            },
        ];

        Self {
            news,
            events,
            obits,
            police,
        }
    }

    /// Drop blank ids/urls and repeated ids (first wins) in every table.
    fn cleaned(mut self) -> Self {
        self.news = clean_list(self.news);
        self.events = clean_list(self.events);
        self.obits = clean_list(self.obits);
        self.police = clean_list(self.police);
        self
    }
}

fn clean_list<S: AsRef<FeedSource>>(items: Vec<S>) -> Vec<S> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|s| {
            let f = s.as_ref();
            let id = f.id.trim();
            !id.is_empty() && !f.url.trim().is_empty() && seen.insert(id.to_string())
        })
        .collect()
}

/// Load sources from an explicit path. Supports TOML or JSON formats.
pub fn load_sources_from(path: &Path) -> Result<SourcesConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading sources from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_sources(&content, ext.as_str())
}

/// Load sources using env var + fallbacks:
/// 1) $INGEST_SOURCES_PATH
/// 2) config/sources.toml
/// 3) config/sources.json
/// 4) built-in seed
pub fn load_sources_default() -> Result<SourcesConfig> {
    if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_sources_from(&pb);
        } else {
            return Err(anyhow!("INGEST_SOURCES_PATH points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from("config/sources.toml");
    if toml_p.exists() {
        return load_sources_from(&toml_p);
    }
    let json_p = PathBuf::from("config/sources.json");
    if json_p.exists() {
        return load_sources_from(&json_p);
    }
    Ok(SourcesConfig::default_seed())
}

fn parse_sources(s: &str, hint_ext: &str) -> Result<SourcesConfig> {
    if hint_ext == "json" {
        let v: SourcesConfig = serde_json::from_str(s).context("parsing sources json")?;
        return Ok(v.cleaned());
    }
    match toml::from_str::<SourcesConfig>(s) {
        Ok(v) => Ok(v.cleaned()),
        Err(toml_err) => serde_json::from_str::<SourcesConfig>(s)
            .map(SourcesConfig::cleaned)
            .map_err(|_| anyhow!("unsupported sources format: {toml_err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_with_categories_and_kinds() {
        let toml = r#"
[[news]]
id = "od"
name = "Observer-Dispatch"
url = "https://od.test/rss"
category = "regional"

[[news]]
id = "od"
name = "Duplicate"
url = "https://dup.test/rss"

[[news]]
id = "  "
name = "Blank"
url = "https://blank.test/rss"

[[police]]
id = "calls"
name = "911"
url = "https://911.test/rss"
kind = "calls"
"#;
        let cfg = parse_sources(toml, "toml").unwrap();
        assert_eq!(cfg.news.len(), 1);
        assert_eq!(cfg.news[0].category, NewsCategory::Regional);
        assert_eq!(cfg.news[0].feed.name, "Observer-Dispatch");
        assert_eq!(cfg.police[0].kind, PoliceFeedKind::Calls);
        assert!(cfg.events.is_empty());
    }

    #[test]
    fn json_accepts_feed_url_alias_and_defaults_category() {
        let json = r#"{"news":[{"id":"a","name":"A","feedUrl":"https://a.test/rss"}]}"#;
        let cfg = parse_sources(json, "json").unwrap();
        assert_eq!(cfg.news[0].feed.url, "https://a.test/rss");
        assert_eq!(cfg.news[0].category, NewsCategory::Local);
    }

    #[test]
    fn seed_covers_every_category() {
        let seed = SourcesConfig::default_seed();
        assert!(!seed.news.is_empty());
        assert!(!seed.events.is_empty());
        assert!(!seed.obits.is_empty());
        assert!(!seed.police.is_empty());
    }
}
