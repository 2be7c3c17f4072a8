// src/ingest/obits.rs
use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::DataPaths;
use crate::ingest::types::{FeedProvider, FeedSource, RawFeedItem};
use crate::ingest::{
    collect_from_sources, dedupe_by_url, generate_id_from_url, normalize_published_at, now_rfc3339,
    sort_by_date_desc,
};
use crate::models::Obit;
use crate::store;

// "Jane Q. Doe, 85, of Utica" / "John Smith, 72"
static RE_OBIT_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<name>[^,]+?)\s*,\s*(?P<age>\d{1,3})\b(?:\s*,\s*of\s+(?P<city>[^,]+?))?\s*(?:,.*)?$")
        .expect("obit title regex")
});

/// Split an obituary headline into name, age and city where it follows the
/// usual "Name, age, of City" shape. Otherwise the whole headline is the name.
pub fn parse_obit_title(title: &str) -> (String, Option<u32>, Option<String>) {
    let clean = html_escape::decode_html_entities(title)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    match RE_OBIT_TITLE.captures(&clean) {
        Some(caps) => {
            let name = caps["name"].to_string();
            let age = caps.name("age").and_then(|m| m.as_str().parse().ok());
            let city = caps.name("city").map(|m| m.as_str().to_string());
            (name, age, city)
        }
        None => (clean, None, None),
    }
}

fn to_obit(raw: &RawFeedItem, now: &str) -> Option<Obit> {
    let url = raw.canonical_url()?;
    let (name, age, city) = parse_obit_title(raw.title.as_deref().unwrap_or_default());
    if name.is_empty() {
        return None;
    }
    Some(Obit {
        id: generate_id_from_url(url),
        name,
        age,
        city,
        date: normalize_published_at(raw.pub_date.as_deref(), now),
        funeral_home: None,
        source_url: url.to_string(),
    })
}

pub async fn ingest_obits(provider: &dyn FeedProvider, sources: &[FeedSource]) -> Vec<Obit> {
    let now = now_rfc3339();
    let obits = collect_from_sources("obits", provider, sources, |_, raw| to_obit(raw, &now)).await;
    sort_by_date_desc(dedupe_by_url(obits))
}

/// Ingest and write `obits.json`.
pub async fn run(provider: &dyn FeedProvider, sources: &[FeedSource], paths: &DataPaths) -> Result<Vec<Obit>> {
    tracing::info!(target: "ingest", sources = sources.len(), "starting obituary ingestion");
    let obits = ingest_obits(provider, sources).await;
    store::write_json_pretty(&paths.obits(), &obits)?;
    tracing::info!(target: "ingest", count = obits.len(), path = %paths.obits().display(), "wrote obits snapshot");
    Ok(obits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_age_city() {
        let (n, a, c) = parse_obit_title("Mary Ann Smith, 85, of Utica");
        assert_eq!(n, "Mary Ann Smith");
        assert_eq!(a, Some(85));
        assert_eq!(c.as_deref(), Some("Utica"));
    }

    #[test]
    fn name_age_only() {
        let (n, a, c) = parse_obit_title("John O&#39;Neil, 72");
        assert_eq!(n, "John O'Neil");
        assert_eq!(a, Some(72));
        assert_eq!(c, None);
    }

    #[test]
    fn free_form_title_is_the_name() {
        let (n, a, c) = parse_obit_title("Remembering   Robert Jones");
        assert_eq!(n, "Remembering Robert Jones");
        assert_eq!(a, None);
        assert_eq!(c, None);
    }
}
