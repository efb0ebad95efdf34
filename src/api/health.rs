//! Health check

use axum::{Json, extract::State};
use chrono::Utc;

use super::dto::HealthResponse;
use crate::AppState;

/// GET /api/health
///
/// Always 200; dependency outages only show up in the payload.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let dependencies = state
        .probes
        .check(state.config.health.probe_timeout())
        .await;

    Json(HealthResponse {
        status: "ok",
        time: Utc::now(),
        db: dependencies.database,
        redis: dependencies.redis,
    })
}
