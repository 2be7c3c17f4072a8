//! Oneida News Hub web service entrypoint.
//! Boots the Axum HTTP server: read-only snapshot routes, ad selection,
//! impression recording, admin ad config and `/metrics`.

use oneida_news_hub::ads::AdCatalog;
use oneida_news_hub::metrics::Metrics;
use oneida_news_hub::{create_router, init_tracing, AppState};
use shuttle_axum::ShuttleAxum;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing("info,api=info,ads=info");

    let ttl_secs = AdCatalog::ttl_from_env().map(|d| d.as_secs()).unwrap_or(0);
    let metrics = Metrics::init(ttl_secs)?;

    let state = AppState::from_env();
    tracing::info!(
        target: "api",
        data_dir = %state.paths.dir().display(),
        admin = state.admin_enabled,
        ad_ttl_secs = ttl_secs,
        "starting oneida-news-hub"
    );

    let router = create_router(state).merge(metrics.router());
    Ok(router.into())
}
