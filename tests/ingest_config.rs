// tests/ingest_config.rs
use oneida_news_hub::ingest::config::{load_sources_default, load_sources_from, SourcesConfig, ENV_PATH};
use oneida_news_hub::models::NewsCategory;
use std::{env, fs};

#[test]
fn parse_toml_and_json_files() {
    let dir = tempfile::tempdir().unwrap();

    let p_toml = dir.path().join("sources.toml");
    fs::write(
        &p_toml,
        r#"
[[news]]
id = "od"
name = "Observer-Dispatch"
url = "https://od.test/rss"
category = "gov"

[[obits]]
id = "legacy"
name = "Legacy"
url = ""
"#,
    )
    .unwrap();
    let cfg = load_sources_from(&p_toml).unwrap();
    assert_eq!(cfg.news.len(), 1);
    assert_eq!(cfg.news[0].category, NewsCategory::Gov);
    assert!(cfg.obits.is_empty(), "blank url is dropped");

    let p_json = dir.path().join("sources.json");
    fs::write(
        &p_json,
        r#"{"events":[{"id":"lib","name":"Library","feedUrl":"https://lib.test/rss","category":"community"}]}"#,
    )
    .unwrap();
    let cfg = load_sources_from(&p_json).unwrap();
    assert_eq!(cfg.events.len(), 1);
    assert_eq!(cfg.events[0].feed.url, "https://lib.test/rss");
}

#[test]
fn garbage_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("sources.toml");
    fs::write(&p, "this is = = not toml").unwrap();
    assert!(load_sources_from(&p).is_err());
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    // run in an empty dir so the repo's own config/ is not picked up
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    env::remove_var(ENV_PATH);

    // 1) nothing on disk -> built-in table
    let seed = load_sources_default().unwrap();
    assert_eq!(seed, SourcesConfig::default_seed());

    // 2) config/sources.toml
    let cfg_dir = tmp.path().join("config");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(
        cfg_dir.join("sources.toml"),
        "[[obits]]\nid = \"o\"\nname = \"O\"\nurl = \"https://o.test/rss\"\n",
    )
    .unwrap();
    let from_toml = load_sources_default().unwrap();
    assert_eq!(from_toml.obits.len(), 1);
    assert!(from_toml.news.is_empty());

    // 3) env wins
    let p_env = tmp.path().join("elsewhere.json");
    fs::write(&p_env, r#"{"news":[{"id":"n","name":"N","url":"https://n.test/rss"}]}"#).unwrap();
    env::set_var(ENV_PATH, &p_env);
    let from_env = load_sources_default().unwrap();
    assert_eq!(from_env.news.len(), 1);
    assert!(from_env.obits.is_empty());

    // 4) env pointing nowhere is an error
    env::set_var(ENV_PATH, tmp.path().join("nope.toml"));
    assert!(load_sources_default().is_err());

    env::remove_var(ENV_PATH);
    env::set_current_dir(old).unwrap();
}
