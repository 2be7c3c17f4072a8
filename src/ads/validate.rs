//! Admin-boundary validation for ad configuration. `PUT /admin/ads` refuses
//! any set that fails here; the catalog only logs these errors when loading
//! an override written by other means.

use std::collections::HashSet;
use thiserror::Error;

use crate::models::{AdCreative, MAX_AD_WEIGHT};
use crate::timeparse::parse_timestamp;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdValidationError {
    #[error("ad #{index} is missing an id")]
    MissingId { index: usize },
    #[error("duplicate ad id '{0}'")]
    DuplicateId(String),
    #[error("ad '{id}' is missing advertiserName")]
    MissingAdvertiser { id: String },
    #[error("ad '{id}' has an invalid targetUrl '{url}'")]
    InvalidTargetUrl { id: String, url: String },
    #[error("ad '{id}' needs at least one category")]
    NoCategories { id: String },
    #[error("ad '{id}' needs at least one placement")]
    NoPlacements { id: String },
    #[error("ad '{id}' has non-positive weight {weight}")]
    NonPositiveWeight { id: String, weight: i64 },
    #[error("ad '{id}' has weight {weight} above the maximum {max}")]
    WeightTooLarge { id: String, weight: i64, max: i64 },
    #[error("ad '{id}' has an unparsable {field} '{value}'")]
    InvalidDate {
        id: String,
        field: &'static str,
        value: String,
    },
    #[error("ad '{id}' has endDate not after startDate")]
    EmptyWindow { id: String },
}

pub fn validate_ad(index: usize, ad: &AdCreative) -> Result<(), AdValidationError> {
    let id = ad.id.trim();
    if id.is_empty() {
        return Err(AdValidationError::MissingId { index });
    }
    let id = id.to_string();
    if ad.advertiser_name.trim().is_empty() {
        return Err(AdValidationError::MissingAdvertiser { id });
    }
    if !is_valid_target(&ad.target_url) {
        return Err(AdValidationError::InvalidTargetUrl {
            id,
            url: ad.target_url.clone(),
        });
    }
    if ad.categories.is_empty() {
        return Err(AdValidationError::NoCategories { id });
    }
    if ad.placements.is_empty() {
        return Err(AdValidationError::NoPlacements { id });
    }
    if ad.weight <= 0 {
        return Err(AdValidationError::NonPositiveWeight { id, weight: ad.weight });
    }
    if ad.weight > MAX_AD_WEIGHT {
        return Err(AdValidationError::WeightTooLarge {
            id,
            weight: ad.weight,
            max: MAX_AD_WEIGHT,
        });
    }

    let start = parse_bound(&id, "startDate", ad.start_date.as_deref())?;
    let end = parse_bound(&id, "endDate", ad.end_date.as_deref())?;
    if let (Some(s), Some(e)) = (start, end) {
        if e <= s {
            return Err(AdValidationError::EmptyWindow { id });
        }
    }
    Ok(())
}

/// Absolute http(s) URL, or a site-relative path such as `/about`.
fn is_valid_target(raw: &str) -> bool {
    let url = raw.trim();
    if url.starts_with('/') && !url.starts_with("//") {
        return !url.contains(char::is_whitespace);
    }
    reqwest::Url::parse(url)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

fn parse_bound(
    id: &str,
    field: &'static str,
    raw: Option<&str>,
) -> Result<Option<chrono::DateTime<chrono::Utc>>, AdValidationError> {
    match raw {
        None => Ok(None),
        Some(v) => parse_timestamp(v).map(Some).ok_or_else(|| AdValidationError::InvalidDate {
            id: id.to_string(),
            field,
            value: v.to_string(),
        }),
    }
}

/// Validate a whole ad set: every ad on its own, plus globally unique ids.
pub fn validate_ads(ads: &[AdCreative]) -> Result<(), AdValidationError> {
    let mut seen = HashSet::new();
    for (i, ad) in ads.iter().enumerate() {
        validate_ad(i, ad)?;
        if !seen.insert(ad.id.trim()) {
            return Err(AdValidationError::DuplicateId(ad.id.trim().to_string()));
        }
    }
    Ok(())
}
