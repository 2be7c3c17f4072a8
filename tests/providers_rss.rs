// tests/providers_rss.rs
use oneida_news_hub::ingest::providers::fixture::FixtureProvider;
use oneida_news_hub::ingest::providers::rss::parse_rss;
use oneida_news_hub::ingest::types::{FeedProvider, FeedSource};

const WKTV: &str = include_str!("fixtures/wktv-local.xml");

#[test]
fn parses_fixture_items_in_document_order() {
    let items = parse_rss(WKTV).expect("parse fixture");
    assert_eq!(items.len(), 4);
    assert_eq!(items[0].canonical_url(), Some("https://wktv.test/news/crash"));
    assert_eq!(items[0].pub_date.as_deref(), Some("Thu, 20 Nov 2025 14:30:00 GMT"));
    assert_eq!(
        items[0].description.as_deref(),
        Some("Two vehicles collided near the intersection on Thursday afternoon.")
    );
    assert_eq!(items[1].title.as_deref(), Some("Rome school board approves budget - vote set"));
    assert_eq!(items[3].canonical_url(), None);
}

#[tokio::test]
async fn memory_fixture_provider_serves_by_source_id() {
    let provider = FixtureProvider::from_pairs([("wktv-local", WKTV)]);
    let ok = provider
        .fetch_items(&FeedSource::new("wktv-local", "WKTV", "https://unused.test"))
        .await
        .unwrap();
    assert_eq!(ok.len(), 4);

    let err = provider
        .fetch_items(&FeedSource::new("other", "Other", "https://unused.test"))
        .await;
    assert!(err.is_err());
    assert_eq!(provider.name(), "fixture");
}
