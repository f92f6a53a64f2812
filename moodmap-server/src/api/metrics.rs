//! External API statistics

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    api::dto::{ApiStatsDto, ExternalMetricsDto},
    state::AppState,
};

/// Response cache counters and per-API call statistics
#[utoipa::path(
    get,
    path = "/api/metrics/external",
    tag = "system",
    responses((status = 200, description = "Cache and external API statistics", body = ExternalMetricsDto))
)]
pub async fn external_metrics(State(state): State<Arc<AppState>>) -> Json<ExternalMetricsDto> {
    let cache = state.moodmap.cache().stats().await;
    let apis = state.moodmap.metrics().summary().await;
    Json(ExternalMetricsDto {
        cache: cache.into(),
        apis: apis.into_iter().map(ApiStatsDto::from).collect(),
    })
}
