//! Static default ad set, used whenever no valid `ads.json` override exists.

use crate::models::{AdCategory, AdCreative, AdPlacement};

pub fn default_ads() -> Vec<AdCreative> {
    vec![
        AdCreative {
            id: "house-advertise-here".into(),
            advertiser_name: "Oneida News Hub".into(),
            label: Some("Sponsored".into()),
            image_url: None,
            image_alt: None,
            target_url: "https://localhost:3000/about#advertise".into(),
            headline: Some("Reach Oneida County readers".into()),
            body_text: Some("Local businesses can sponsor any section of the site.".into()),
            categories: vec![AdCategory::Generic],
            placements: vec![AdPlacement::Sidebar, AdPlacement::Footer, AdPlacement::BetweenBlocks],
            weight: 1,
            active: true,
            start_date: None,
            end_date: None,
        },
        AdCreative {
            id: "mv-sporting-goods".into(),
            advertiser_name: "Mohawk Valley Sporting Goods".into(),
            label: Some("Sponsored".into()),
            image_url: None,
            image_alt: None,
            target_url: "https://example.com/mv-sporting-goods".into(),
            headline: Some("Gear up for Section III season".into()),
            body_text: None,
            categories: vec![AdCategory::Sports, AdCategory::Events],
            placements: vec![AdPlacement::Sidebar, AdPlacement::TopOfPage],
            weight: 3,
            active: true,
            start_date: None,
            end_date: None,
        },
        AdCreative {
            id: "genesee-heating".into(),
            advertiser_name: "Genesee Street Heating & Cooling".into(),
            label: Some("Sponsored".into()),
            image_url: None,
            image_alt: None,
            target_url: "https://example.com/genesee-heating".into(),
            headline: Some("Furnace check-ups before the lake-effect snow".into()),
            body_text: None,
            categories: vec![AdCategory::Weather, AdCategory::Home, AdCategory::LocalNews],
            placements: vec![AdPlacement::Sidebar, AdPlacement::Inline, AdPlacement::Header],
            weight: 2,
            active: true,
            start_date: None,
            end_date: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ads::validate::validate_ads;

    #[test]
    fn seed_passes_validation() {
        validate_ads(&default_ads()).unwrap();
    }
}
