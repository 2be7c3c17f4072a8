// src/ingest/providers/fixture.rs
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;

use super::rss::parse_rss;
use crate::ingest::types::{FeedProvider, FeedSource, RawFeedItem};

/// Offline provider: serves RSS documents keyed by source id, either from
/// memory or from `<dir>/<source id>.xml`.
pub struct FixtureProvider {
    mode: Mode,
}

enum Mode {
    Memory(HashMap<String, String>),
    Dir(PathBuf),
}

impl FixtureProvider {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            mode: Mode::Memory(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        }
    }

    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            mode: Mode::Dir(dir.into()),
        }
    }
}

#[async_trait]
impl FeedProvider for FixtureProvider {
    async fn fetch_items(&self, source: &FeedSource) -> Result<Vec<RawFeedItem>> {
        let xml = match &self.mode {
            Mode::Memory(map) => map
                .get(&source.id)
                .cloned()
                .ok_or_else(|| anyhow!("no fixture for source {}", source.id))?,
            Mode::Dir(dir) => {
                let path = dir.join(format!("{}.xml", source.id));
                tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("reading fixture {}", path.display()))?
            }
        };
        parse_rss(&xml)
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}
