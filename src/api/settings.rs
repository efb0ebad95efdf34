//! Runtime configuration endpoints

use axum::{Json, extract::State};

use crate::AppState;
use crate::auth::CurrentUser;
use crate::data::{RuntimeConfig, RuntimeConfigPatch};

/// GET /api/config
pub async fn get_config(State(state): State<AppState>) -> Json<RuntimeConfig> {
    Json(state.settings.get().await)
}

/// PUT /api/config
///
/// Partial merge: absent or empty fields keep their current value.
pub async fn update_config(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(patch): Json<RuntimeConfigPatch>,
) -> Json<RuntimeConfig> {
    let updated = state.settings.apply(patch).await;
    tracing::info!(
        user_id = %user.id,
        maintenance_mode = updated.maintenance_mode,
        "Runtime configuration updated"
    );
    Json(updated)
}
