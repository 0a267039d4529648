//! REST API routes.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::{forecasts, request_id};
use crate::config::Config;
use crate::state::AppState;

/// Create the API router.
pub fn create_router(config: &Config) -> Router<Arc<AppState>> {
    let v1_routes = Router::new()
        .route("/v1/forecasts/conflicts", post(forecasts::forecast_conflicts))
        .route(
            "/v1/forecasts/conflict-features",
            post(forecasts::forecast_conflict_features),
        );

    let v2_routes = Router::new()
        .route("/v2/forecasts/conflicts", post(forecasts::forecast_conflicts_v2))
        .route(
            "/v2/forecasts/conflict-features",
            post(forecasts::forecast_conflict_features_v2),
        );

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .merge(v1_routes)
        .merge(v2_routes)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id::ensure_request_id))
        .layer(CorsLayer::permissive())
}
