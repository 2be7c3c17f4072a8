//! Batch ingestion CLI: fetch feeds, write JSON snapshots, merge summaries.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use oneida_news_hub::config::ai::AiConfig;
use oneida_news_hub::config::{DataPaths, ENV_DATA_DIR};
use oneida_news_hub::ingest::config::{load_sources_default, load_sources_from, SourcesConfig};
use oneida_news_hub::ingest::providers::fixture::FixtureProvider;
use oneida_news_hub::ingest::providers::rss::RssProvider;
use oneida_news_hub::ingest::summaries::MergeOptions;
use oneida_news_hub::ingest::types::FeedProvider;
use oneida_news_hub::ingest::{events, news, obits, police, summaries};
use oneida_news_hub::{build_summarizer, init_tracing};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Target {
    News,
    Events,
    Obits,
    Police,
    Summaries,
    All,
}

#[derive(Parser, Debug)]
#[command(name = "ingest")]
#[command(about = "Fetch regional feeds and write JSON snapshots", version, long_about = None)]
struct Cli {
    /// What to ingest
    #[arg(value_enum)]
    target: Target,

    /// Snapshot output directory
    #[arg(long, env = ENV_DATA_DIR)]
    data_dir: Option<PathBuf>,

    /// Source table (TOML or JSON); defaults to $INGEST_SOURCES_PATH, config/sources.*, built-ins
    #[arg(long)]
    sources: Option<PathBuf>,

    /// Read `<source id>.xml` from this directory instead of fetching over HTTP
    #[arg(long)]
    fixture_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing("info,ingest=info,summaries=info");

    let cli = Cli::parse();
    let paths = cli.data_dir.clone().map(DataPaths::new).unwrap_or_default();

    let sources: SourcesConfig = match &cli.sources {
        Some(p) => load_sources_from(p)?,
        None => load_sources_default()?,
    };

    let provider: Box<dyn FeedProvider> = match &cli.fixture_dir {
        Some(dir) => Box::new(FixtureProvider::from_dir(dir)),
        None => Box::new(RssProvider::new().context("building http client")?),
    };

    tracing::info!(
        target: "ingest",
        target_set = ?cli.target,
        data_dir = %paths.dir().display(),
        provider = provider.name(),
        "ingest start"
    );

    let t = cli.target;
    let all = t == Target::All;
    if all || t == Target::News {
        let buckets = news::run(provider.as_ref(), &sources.news, &paths).await?;
        tracing::info!(target: "ingest", items = buckets.len(), "news written");
    }
    if all || t == Target::Events {
        let items = events::run(provider.as_ref(), &sources.events, &paths).await?;
        tracing::info!(target: "ingest", items = items.len(), "events written");
    }
    if all || t == Target::Obits {
        let items = obits::run(provider.as_ref(), &sources.obits, &paths).await?;
        tracing::info!(target: "ingest", items = items.len(), "obits written");
    }
    if all || t == Target::Police {
        let data = police::run(provider.as_ref(), &sources.police, &paths).await?;
        tracing::info!(target: "ingest", calls = data.calls.len(), releases = data.releases.len(), "police written");
    }
    if all || t == Target::Summaries {
        let summarizer = build_summarizer(&AiConfig::load_default());
        let stats = summaries::run(&paths, summarizer.as_ref(), MergeOptions::default()).await?;
        tracing::info!(target: "summaries", new = stats.new, skipped = stats.skipped, missing_id = stats.missing_id, "summaries done");
    }
    Ok(())
}
