// tests/ingest_dedup.rs
use oneida_news_hub::ingest::{dedupe_by_url, generate_id_from_url, sort_by_date_desc};
use oneida_news_hub::models::{NewsCategory, NewsItem, PoliceCall};

fn news(url: &str, title: &str, at: &str) -> NewsItem {
    NewsItem {
        id: generate_id_from_url(url),
        title: title.into(),
        source_name: "src".into(),
        source_url: url.into(),
        published_at: at.into(),
        category: NewsCategory::Local,
        tags: None,
        summary: None,
    }
}

#[test]
fn first_occurrence_wins_and_order_is_kept() {
    let out = dedupe_by_url(vec![
        news("a", "first a", "2025-11-20T10:00:00Z"),
        news("b", "b", "2025-11-20T11:00:00Z"),
        news("a", "second a", "2025-11-20T12:00:00Z"),
    ]);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].title, "first a");
    assert_eq!(out[1].source_url, "b");
}

#[test]
fn calls_without_url_are_never_collapsed() {
    let call = |id: &str, url: Option<&str>| PoliceCall {
        id: id.into(),
        timestamp: "2025-11-20T08:00:00Z".into(),
        agency: None,
        description: "MVA".into(),
        location: None,
        source_url: url.map(str::to_string),
    };
    let out = dedupe_by_url(vec![
        call("1", None),
        call("2", None),
        call("3", Some("https://911.test/x")),
        call("4", Some("https://911.test/x")),
    ]);
    let ids: Vec<_> = out.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
}

#[test]
fn sort_is_newest_first_and_idempotent() {
    let once = sort_by_date_desc(vec![
        news("a", "a", "Wed, 19 Nov 2025 09:00:00 GMT"),
        news("b", "b", "2025-11-21T00:00:00Z"),
        news("c", "c", "not a date"),
        news("d", "d", "2025-11-20T14:30:00Z"),
    ]);
    let urls: Vec<_> = once.iter().map(|n| n.source_url.clone()).collect();
    assert_eq!(urls, vec!["b", "d", "a", "c"]);

    let twice = sort_by_date_desc(once.clone());
    assert_eq!(twice, once);
}

#[test]
fn equal_and_unparsable_timestamps_keep_input_order() {
    let out = sort_by_date_desc(vec![
        news("x", "x", "garbage"),
        news("y", "y", "also garbage"),
        news("p", "p", "2025-11-20T10:00:00Z"),
        news("q", "q", "2025-11-20T10:00:00Z"),
    ]);
    let urls: Vec<_> = out.iter().map(|n| n.source_url.as_str()).collect();
    assert_eq!(urls, vec!["p", "q", "x", "y"]);
}
