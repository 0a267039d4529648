//! Conflict forecast endpoints.
//!
//! `/v1` computes inline on the request task; `/v2` runs the scan on the
//! blocking pool.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use forecast_core::{ConflictForecastRequest, ConflictForecastResponse, FeatureCollection};

use crate::state::AppState;

type ApiError = (StatusCode, Json<Value>);

pub async fn forecast_conflicts(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ConflictForecastRequest>,
) -> Json<ConflictForecastResponse> {
    let response = state.forecast(&request);
    log_forecast(&request, response.conflicts.len());
    Json(response)
}

pub async fn forecast_conflict_features(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ConflictForecastRequest>,
) -> Json<FeatureCollection> {
    let collection = state.feature_collection(&request);
    tracing::info!(
        "Rendered {} features for {} trajectories",
        collection.features.len(),
        request.trajectories.len()
    );
    Json(collection)
}

pub async fn forecast_conflicts_v2(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ConflictForecastRequest>,
) -> Result<Json<ConflictForecastResponse>, ApiError> {
    let (request, response) = run_blocking(state, move |state| {
        let response = state.forecast(&request);
        (request, response)
    })
    .await?;
    log_forecast(&request, response.conflicts.len());
    Ok(Json(response))
}

pub async fn forecast_conflict_features_v2(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ConflictForecastRequest>,
) -> Result<Json<FeatureCollection>, ApiError> {
    let trajectories = request.trajectories.len();
    let collection = run_blocking(state, move |state| state.feature_collection(&request)).await?;
    tracing::info!(
        "Rendered {} features for {} trajectories",
        collection.features.len(),
        trajectories
    );
    Ok(Json(collection))
}

async fn run_blocking<T, F>(state: Arc<AppState>, job: F) -> Result<T, ApiError>
where
    F: FnOnce(&AppState) -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || job(&state))
        .await
        .map_err(|err| {
            tracing::error!("Forecast task failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Forecast failed",
                    "details": err.to_string()
                })),
            )
        })
}

fn log_forecast(request: &ConflictForecastRequest, conflicts: usize) {
    tracing::info!(
        "Forecast for {} trajectories ({} waypoints) and {} regions found {} conflicts",
        request.trajectories.len(),
        request
            .trajectories
            .iter()
            .map(|trajectory| trajectory.waypoints.len())
            .sum::<usize>(),
        request.separation_requirements.len(),
        conflicts
    );
}
