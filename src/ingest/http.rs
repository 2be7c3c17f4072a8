// src/ingest/http.rs
use anyhow::{bail, Context, Result};
use std::time::Duration;

pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; OneidaNewsHub/1.0; +https://localhost:3000)";

/// Shared client for feed fetches: one total timeout, no retries.
pub fn build_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(FETCH_TIMEOUT)
        .build()
        .context("building feed http client")
}

/// GET `url` and return the body. Non-2xx and timeouts are errors.
pub async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String> {
    tracing::debug!(target: "ingest", %url, "http get");
    let resp = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("GET {url}"))?;
    let status = resp.status();
    if !status.is_success() {
        bail!("HTTP {}: {}", status.as_u16(), status.canonical_reason().unwrap_or("error"));
    }
    let text = resp.text().await.with_context(|| format!("reading body of {url}"))?;
    tracing::debug!(target: "ingest", %url, chars = text.len(), "http fetched");
    Ok(text)
}
