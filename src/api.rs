use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shuttle_axum::axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::ads::impressions::{AdReport, ImpressionStore};
use crate::ads::validate::validate_ads;
use crate::ads::{get_ads_for_placement, AdCatalog, AdRequest, AdSource, MAX_ADS_PER_REQUEST};
use crate::config::{admin_enabled_from_env, DataPaths};
use crate::ingest::summaries::apply_summaries;
use crate::models::{
    AdCategory, AdCreative, AdPlacement, AdsFile, EventItem, NewsBuckets, Obit, PoliceData, SummaryCache,
};
use crate::store;

#[derive(Clone)]
pub struct AppState {
    pub paths: DataPaths,
    pub catalog: AdCatalog,
    pub impressions: Arc<ImpressionStore>,
    pub admin_enabled: bool,
}

impl AppState {
    pub fn new(paths: DataPaths, admin_enabled: bool) -> Self {
        let catalog = AdCatalog::new(paths.ads());
        let impressions = Arc::new(ImpressionStore::new(paths.ad_metrics()));
        Self {
            paths,
            catalog,
            impressions,
            admin_enabled,
        }
    }

    /// `DATA_DIR`, `ADMIN_ENABLED` and `ADS_CACHE_TTL_SECS` from the environment.
    pub fn from_env() -> Self {
        let mut state = Self::new(DataPaths::from_env(), admin_enabled_from_env());
        state.catalog = state.catalog.with_ttl(AdCatalog::ttl_from_env());
        state
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/news", get(news))
        .route("/events", get(events))
        .route("/obits", get(obits))
        .route("/police", get(police))
        .route("/ads", get(ads))
        .route("/ads/impression", post(record_impression))
        .route("/admin/ads", get(admin_get_ads).put(admin_put_ads))
        .route("/admin/ad-metrics", get(admin_ad_metrics))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    (status, Json(ErrorBody { error: msg.into() }))
}

fn require_admin(state: &AppState) -> Result<(), ApiError> {
    if state.admin_enabled {
        Ok(())
    } else {
        Err(api_error(StatusCode::FORBIDDEN, "admin routes are disabled"))
    }
}

async fn news(State(state): State<AppState>) -> Json<NewsBuckets> {
    let mut buckets: NewsBuckets = store::read_json_or_default(&state.paths.news());
    let cache: SummaryCache = store::read_json_or_default(&state.paths.summaries());
    apply_summaries(&mut buckets, &cache);
    Json(buckets)
}

async fn events(State(state): State<AppState>) -> Json<Vec<EventItem>> {
    Json(store::read_json_or_default(&state.paths.events()))
}

async fn obits(State(state): State<AppState>) -> Json<Vec<Obit>> {
    Json(store::read_json_or_default(&state.paths.obits()))
}

async fn police(State(state): State<AppState>) -> Json<PoliceData> {
    Json(store::read_json_or_default(&state.paths.police()))
}

#[derive(Deserialize)]
struct AdsQuery {
    category: AdCategory,
    placement: AdPlacement,
    #[serde(default)]
    count: Option<usize>,
}

async fn ads(State(state): State<AppState>, Query(q): Query<AdsQuery>) -> Json<Vec<AdCreative>> {
    let count = q.count.unwrap_or(1).clamp(1, MAX_ADS_PER_REQUEST);
    let req = AdRequest::new(q.category, q.placement).with_count(count);
    Json(get_ads_for_placement(&state.catalog, &req))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImpressionReq {
    #[serde(default)]
    ad_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImpressionResp {
    ad_id: String,
    impressions: u64,
}

async fn record_impression(
    State(state): State<AppState>,
    Json(body): Json<ImpressionReq>,
) -> Result<Json<ImpressionResp>, ApiError> {
    let ad_id = body.ad_id.trim().to_string();
    if ad_id.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "adId is required"));
    }
    let store = state.impressions.clone();
    let id = ad_id.clone();
    let res = tokio::task::spawn_blocking(move || store.record_impression(&id))
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    match res {
        Ok(impressions) => Ok(Json(ImpressionResp { ad_id, impressions })),
        Err(e) => {
            tracing::error!(target: "api", ad_id = %ad_id, error = ?e, "failed to record impression");
            Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, "could not record impression"))
        }
    }
}

#[derive(Serialize)]
struct AdminAdsResp {
    source: AdSource,
    ads: Vec<AdCreative>,
}

async fn admin_get_ads(State(state): State<AppState>) -> Result<Json<AdminAdsResp>, ApiError> {
    require_admin(&state)?;
    let ads = state.catalog.refresh();
    Ok(Json(AdminAdsResp {
        source: state.catalog.source(),
        ads: ads.as_ref().clone(),
    }))
}

async fn admin_put_ads(
    State(state): State<AppState>,
    Json(file): Json<AdsFile>,
) -> Result<Json<AdminAdsResp>, ApiError> {
    require_admin(&state)?;
    validate_ads(&file.ads).map_err(|e| api_error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;

    let path = state.paths.ads();
    store::write_json_pretty(&path, &file).map_err(|e| {
        tracing::error!(target: "api", path = %path.display(), error = ?e, "failed to write ad override");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "could not save ads")
    })?;
    let ads = state.catalog.refresh();
    tracing::info!(target: "api", count = ads.len(), "ad override updated");
    Ok(Json(AdminAdsResp {
        source: state.catalog.source(),
        ads: ads.as_ref().clone(),
    }))
}

async fn admin_ad_metrics(State(state): State<AppState>) -> Result<Json<AdReport>, ApiError> {
    require_admin(&state)?;
    let ads = state.catalog.ads();
    Ok(Json(state.impressions.report(&ads)))
}
