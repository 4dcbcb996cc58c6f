use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{RecommendationRequest, RecommendationResponse},
    routes::AppState,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub tmdb_available: bool,
    pub timestamp: String,
}

/// Reports whether the catalog is reachable; always answers 200
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let tmdb_available = state.catalog.check_reachable().await;

    Json(HealthResponse {
        status: "ok",
        tmdb_available,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Handler for recommendations endpoint
///
/// Body rejections are turned into `AppError` so that every failure keeps the
/// JSON error shape.
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> AppResult<Json<RecommendationResponse>> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!(request_id = %request_id, error = %rejection, "Unreadable recommendation body");
        rejection
    })?;

    tracing::info!(
        request_id = %request_id,
        mood = %request.mood,
        action = %request.action,
        source = %request.source,
        excluded = request.exclude_movies.len(),
        "Processing recommendation request"
    );

    let response = state
        .recommendations
        .get_recommendations(
            &request.mood,
            &request.action,
            &request.source,
            &request.exclude_movies,
        )
        .await?;

    tracing::info!(
        request_id = %request_id,
        movies = response.movies.len(),
        source = ?response.source,
        fallback = response.fallback,
        "Recommendations served"
    );

    Ok(Json(response))
}
