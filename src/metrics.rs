use anyhow::{Context, Result};
use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder. `ad_ttl_secs` is exported as a
    /// static gauge (0 = ad set cached until refreshed).
    pub fn init(ad_ttl_secs: u64) -> Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;

        describe_counter!("ads_served_total", "Ads returned by selection, per placement.");
        describe_counter!("ad_impressions_total", "Recorded ad impressions.");
        describe_gauge!("ads_cache_ttl_secs", "Ad catalog cache TTL in seconds.");
        gauge!("ads_cache_ttl_secs").set(ad_ttl_secs as f64);

        Ok(Self { handle })
    }

    /// Router exposing `/metrics` in the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
