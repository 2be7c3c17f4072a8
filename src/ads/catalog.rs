// src/ads/catalog.rs
//! Explicit, caller-owned ad set cache.
//!
//! The catalog serves either the static default set or an `ads.json`
//! override, which replaces the defaults wholesale. A loaded set is kept
//! until `refresh()` or, when a TTL is configured, until it goes stale.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use crate::ads::seed::default_ads;
use crate::ads::validate::validate_ad;
use crate::models::{AdCreative, AdsFile};
use crate::store;

pub const ENV_CACHE_TTL: &str = "ADS_CACHE_TTL_SECS";

/// Where the currently served set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdSource {
    Override,
    Static,
}

#[derive(Clone)]
struct Loaded {
    ads: Arc<Vec<AdCreative>>,
    source: AdSource,
    at: Instant,
}

#[derive(Clone)]
pub struct AdCatalog {
    override_path: Option<PathBuf>,
    defaults: Arc<Vec<AdCreative>>,
    ttl: Option<Duration>,
    cached: Arc<RwLock<Option<Loaded>>>,
}

impl AdCatalog {
    /// Catalog backed by an optional override file and the built-in defaults.
    pub fn new(override_path: impl Into<PathBuf>) -> Self {
        Self {
            override_path: Some(override_path.into()),
            defaults: Arc::new(default_ads()),
            ttl: None,
            cached: Arc::new(RwLock::new(None)),
        }
    }

    /// Catalog that always serves `ads`; nothing is read from disk.
    pub fn from_ads(ads: Vec<AdCreative>) -> Self {
        Self {
            override_path: None,
            defaults: Arc::new(ads),
            ttl: None,
            cached: Arc::new(RwLock::new(None)),
        }
    }

    pub fn with_defaults(mut self, ads: Vec<AdCreative>) -> Self {
        self.defaults = Arc::new(ads);
        self
    }

    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }

    /// TTL from `$ADS_CACHE_TTL_SECS`; unset, zero or garbage means no expiry.
    pub fn ttl_from_env() -> Option<Duration> {
        std::env::var(ENV_CACHE_TTL)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn override_path(&self) -> Option<&Path> {
        self.override_path.as_deref()
    }

    pub fn static_ads(&self) -> &[AdCreative] {
        &self.defaults
    }

    /// Current ad set, loading it on first use or after the TTL elapsed.
    pub fn ads(&self) -> Arc<Vec<AdCreative>> {
        self.current().ads
    }

    pub fn source(&self) -> AdSource {
        self.current().source
    }

    /// Drop the cached set and load again.
    pub fn refresh(&self) -> Arc<Vec<AdCreative>> {
        let loaded = self.load();
        if let Ok(mut guard) = self.cached.write() {
            *guard = Some(loaded.clone());
        }
        loaded.ads
    }

    fn current(&self) -> Loaded {
        if let Ok(guard) = self.cached.read() {
            if let Some(l) = guard.as_ref() {
                let fresh = self.ttl.map_or(true, |ttl| l.at.elapsed() < ttl);
                if fresh {
                    return l.clone();
                }
            }
        }
        let loaded = self.load();
        if let Ok(mut guard) = self.cached.write() {
            *guard = Some(loaded.clone());
        }
        loaded
    }

    fn load(&self) -> Loaded {
        let (ads, source) = match self.override_path.as_deref().and_then(load_override) {
            Some(ads) => (Arc::new(ads), AdSource::Override),
            None => (self.defaults.clone(), AdSource::Static),
        };
        tracing::debug!(target: "ads", count = ads.len(), source = ?source, "ad set loaded");
        Loaded {
            ads,
            source,
            at: Instant::now(),
        }
    }
}

/// Read an override file. Only an absent or unparsable file yields `None`;
/// a parsed `{ads: [...]}` replaces the defaults even when some entries are
/// not servable. Entries without an id or repeating an earlier id are
/// dropped. Other problems are logged and left to the eligibility filter and
/// the weight clamp.
pub fn load_override(path: &Path) -> Option<Vec<AdCreative>> {
    let file: AdsFile = store::read_json_opt(path)?;
    let mut seen = HashSet::new();
    let mut ads = Vec::with_capacity(file.ads.len());
    for (i, ad) in file.ads.into_iter().enumerate() {
        let id = ad.id.trim().to_string();
        if id.is_empty() || !seen.insert(id.clone()) {
            tracing::warn!(target: "ads", path = %path.display(), index = i, id = %id, "dropping ad without a unique id");
            continue;
        }
        if let Err(e) = validate_ad(i, &ad) {
            tracing::warn!(target: "ads", path = %path.display(), error = %e, "ad override entry is not servable as written");
        }
        ads.push(ad);
    }
    Some(ads)
}
