// src/ads/impressions.rs
//! Impression counters persisted in `ad-metrics.json`. Reporting only; the
//! selection engine never reads these.

use anyhow::{bail, Result};
use metrics::counter;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::models::{AdCreative, AdMetrics};
use crate::store;

pub struct ImpressionStore {
    path: PathBuf,
    // serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl ImpressionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current counters; missing or corrupt file reads as empty.
    pub fn load(&self) -> AdMetrics {
        store::read_json_or_default(&self.path)
    }

    /// Count one impression for `ad_id` and persist. Returns the new total.
    pub fn record_impression(&self, ad_id: &str) -> Result<u64> {
        let id = ad_id.trim();
        if id.is_empty() {
            bail!("adId is required");
        }
        let _guard = self.lock.lock().unwrap_or_else(|p| p.into_inner());

        let mut m = self.load();
        let count = m.impressions_by_ad_id.entry(id.to_string()).or_insert(0);
        *count += 1;
        let total = *count;
        m.updated_at = crate::ingest::now_rfc3339();
        store::write_json_pretty(&self.path, &m)?;

        counter!("ad_impressions_total").increment(1);
        tracing::debug!(target: "ads", ad_id = id, total, "impression recorded");
        Ok(total)
    }

    pub fn report(&self, ads: &[AdCreative]) -> AdReport {
        build_report(ads, &self.load())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AdReportRow {
    pub ad: AdCreative,
    pub impressions: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdReport {
    pub updated_at: String,
    pub rows: Vec<AdReportRow>,
}

/// One row per ad, most impressions first; ads never seen count 0.
/// Ties keep the ad set's order.
pub fn build_report(ads: &[AdCreative], metrics: &AdMetrics) -> AdReport {
    let mut rows: Vec<AdReportRow> = ads
        .iter()
        .map(|ad| AdReportRow {
            ad: ad.clone(),
            impressions: metrics.impressions_by_ad_id.get(&ad.id).copied().unwrap_or(0),
        })
        .collect();
    rows.sort_by(|a, b| b.impressions.cmp(&a.impressions));
    AdReport {
        updated_at: metrics.updated_at.clone(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ads::seed::default_ads;

    #[test]
    fn records_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImpressionStore::new(dir.path().join("ad-metrics.json"));
        let ads = default_ads();

        assert_eq!(store.record_impression(&ads[1].id).unwrap(), 1);
        assert_eq!(store.record_impression(&format!("  {} ", ads[1].id)).unwrap(), 2);
        assert_eq!(store.record_impression(&ads[2].id).unwrap(), 1);
        assert!(store.record_impression("   ").is_err());

        let report = store.report(&ads);
        assert_eq!(report.rows.len(), ads.len());
        assert_eq!(report.rows[0].ad.id, ads[1].id);
        assert_eq!(report.rows[0].impressions, 2);
        assert_eq!(report.rows[2].impressions, 0);
        assert!(!report.updated_at.is_empty());
    }

    #[test]
    fn corrupt_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ad-metrics.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = ImpressionStore::new(&path);
        assert!(store.load().impressions_by_ad_id.is_empty());
        assert_eq!(store.record_impression("x").unwrap(), 1);
    }
}
