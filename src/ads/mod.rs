// src/ads/mod.rs
//! Ad selection: eligibility filter, weighted sampling without replacement,
//! and the `get_ads_for_placement` entry point.

pub mod catalog;
pub mod impressions;
pub mod seed;
pub mod validate;

use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use rand::Rng;

pub use catalog::{AdCatalog, AdSource};

use crate::models::{AdCategory, AdCreative, AdPlacement};
use crate::timeparse::parse_timestamp;

/// Upper bound on ads returned by one request.
pub const MAX_ADS_PER_REQUEST: usize = 10;

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ads_served_total", "Ads returned by selection, per placement.");
        describe_counter!("ad_impressions_total", "Recorded ad impressions.");
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdRequest {
    pub category: AdCategory,
    pub placement: AdPlacement,
    pub count: usize,
}

impl AdRequest {
    pub fn new(category: AdCategory, placement: AdPlacement) -> Self {
        Self {
            category,
            placement,
            count: 1,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }
}

/// `now` lies in `[startDate, endDate)`. Unset or unparsable bounds are open.
pub fn is_within_date_range(ad: &AdCreative, now: DateTime<Utc>) -> bool {
    if let Some(start) = ad.start_date.as_deref().and_then(parse_timestamp) {
        if now < start {
            return false;
        }
    }
    if let Some(end) = ad.end_date.as_deref().and_then(parse_timestamp) {
        if now >= end {
            return false;
        }
    }
    true
}

pub fn is_eligible(ad: &AdCreative, category: AdCategory, placement: AdPlacement, now: DateTime<Utc>) -> bool {
    ad.active
        && (ad.categories.contains(&category) || ad.categories.contains(&AdCategory::Generic))
        && ad.placements.contains(&placement)
        && is_within_date_range(ad, now)
}

/// Ads allowed to show for `(category, placement)` at `now`, in set order.
pub fn eligible_ads(
    ads: &[AdCreative],
    category: AdCategory,
    placement: AdPlacement,
    now: DateTime<Utc>,
) -> Vec<AdCreative> {
    ads.iter()
        .filter(|ad| is_eligible(ad, category, placement, now))
        .cloned()
        .collect()
}

/// Sequential weighted sampling without replacement. A pool no larger than
/// `count` comes back unchanged, order included.
pub fn pick_weighted_random<R: Rng + ?Sized>(mut pool: Vec<AdCreative>, count: usize, rng: &mut R) -> Vec<AdCreative> {
    if pool.len() <= count {
        return pool;
    }

    let mut picked = Vec::with_capacity(count);
    while picked.len() < count && !pool.is_empty() {
        let total = pool
            .iter()
            .map(AdCreative::effective_weight)
            .fold(0u64, u64::saturating_add);
        let mut roll = rng.random_range(0..total);
        let mut idx = pool.len() - 1;
        for (i, ad) in pool.iter().enumerate() {
            let w = ad.effective_weight();
            if roll < w {
                idx = i;
                break;
            }
            roll -= w;
        }
        picked.push(pool.remove(idx));
    }
    picked
}

/// Select up to `req.count` ads for a page slot. Never errors; an empty
/// result means nothing is eligible.
pub fn get_ads_for_placement(catalog: &AdCatalog, req: &AdRequest) -> Vec<AdCreative> {
    get_ads_for_placement_with(catalog, req, Utc::now(), &mut rand::rng())
}

/// [`get_ads_for_placement`] with an explicit clock and RNG.
pub fn get_ads_for_placement_with<R: Rng + ?Sized>(
    catalog: &AdCatalog,
    req: &AdRequest,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<AdCreative> {
    ensure_metrics_described();

    let ads = catalog.ads();
    let eligible = eligible_ads(&ads, req.category, req.placement, now);
    if eligible.is_empty() {
        tracing::debug!(target: "ads", category = ?req.category, placement = req.placement.as_str(), "no eligible ads");
        return Vec::new();
    }
    let chosen = pick_weighted_random(eligible, req.count, rng);
    counter!("ads_served_total", "placement" => req.placement.as_str()).increment(chosen.len() as u64);
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ad(id: &str, weight: i64) -> AdCreative {
        AdCreative {
            id: id.into(),
            advertiser_name: "Adv".into(),
            label: None,
            image_url: None,
            image_alt: None,
            target_url: "https://adv.test".into(),
            headline: None,
            body_text: None,
            categories: vec![AdCategory::Sports],
            placements: vec![AdPlacement::Sidebar],
            weight,
            active: true,
            start_date: None,
            end_date: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 20, 12, 0, 0).unwrap()
    }

    #[test]
    fn end_date_is_exclusive_start_inclusive() {
        let mut a = ad("a", 1);
        a.start_date = Some("2025-11-20T12:00:00Z".into());
        assert!(is_within_date_range(&a, now()));
        a.end_date = Some("2025-11-20T12:00:00Z".into());
        assert!(!is_within_date_range(&a, now()));
    }

    #[test]
    fn unparsable_bounds_are_open() {
        let mut a = ad("a", 1);
        a.end_date = Some("whenever".into());
        assert!(is_within_date_range(&a, now()));
    }

    #[test]
    fn wrong_placement_is_filtered() {
        let ads = vec![ad("a", 1)];
        assert!(eligible_ads(&ads, AdCategory::Sports, AdPlacement::Footer, now()).is_empty());
        assert_eq!(eligible_ads(&ads, AdCategory::Sports, AdPlacement::Sidebar, now()).len(), 1);
    }

    #[test]
    fn non_positive_weight_never_hangs() {
        let mut rng = StdRng::seed_from_u64(7);
        let picked = pick_weighted_random(vec![ad("a", 0), ad("b", -5), ad("c", 1)], 2, &mut rng);
        assert_eq!(picked.len(), 2);
        assert_ne!(picked[0].id, picked[1].id);
    }

    #[test]
    fn huge_weights_do_not_overflow() {
        let mut rng = StdRng::seed_from_u64(11);
        let pool = vec![ad("a", i64::MAX), ad("b", i64::MAX), ad("c", i64::MAX)];
        let picked = pick_weighted_random(pool, 2, &mut rng);
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn count_zero_selects_nothing_from_larger_pool() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(pick_weighted_random(vec![ad("a", 1)], 0, &mut rng).is_empty());
    }
}
