//! Admin status endpoint

use axum::{Json, Router, extract::State, routing::get};
use chrono::Utc;

use super::dto::AdminStats;
use crate::AppState;

/// Create admin router
///
/// Routes:
/// - GET /admin/stats - Version, dependency status and entity counts
pub fn admin_router() -> Router<AppState> {
    Router::new().route("/stats", get(stats))
}

/// GET /admin/stats
async fn stats(State(state): State<AppState>) -> Json<AdminStats> {
    state.broadcaster.flush_evictions().await;
    let dependencies = state
        .probes
        .check(state.config.health.probe_timeout())
        .await;

    Json(AdminStats {
        version: format!("v{}", env!("CARGO_PKG_VERSION")),
        time: Utc::now(),
        db: dependencies.database,
        redis: dependencies.redis,
        messages_count: state.messages.count().await,
        users_count: state.users.count().await,
        posts_count: state.posts.count().await,
        comments_count: state.comments.count().await,
        online_count: state.broadcaster.registry().count().await,
    })
}
