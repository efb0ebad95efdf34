//! WebSocket upgrade and live statistics

use axum::{
    Json,
    extract::{Query, State, WebSocketUpgrade},
    response::Response,
};
use chrono::Utc;

use super::dto::{LiveStats, PostStats, TotalStats, UserStats, WsParams};
use crate::AppState;
use crate::realtime::run_session;

/// GET /ws?user_id=
///
/// The identity is taken from the query as-is; sessions are not
/// authenticated.
pub async fn websocket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(params): Query<WsParams>,
) -> Response {
    let identity = params.identity();
    let broadcaster = state.broadcaster.clone();
    ws.on_upgrade(move |socket| run_session(socket, broadcaster, identity))
}

/// GET /api/stats/live
///
/// Each counter is read under its own store's lock; the result is not an
/// atomic snapshot across stores.
pub async fn live_stats(State(state): State<AppState>) -> Json<LiveStats> {
    state.broadcaster.flush_evictions().await;
    let now = Utc::now();
    let midnight = now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|start| start.and_utc())
        .unwrap_or(now);

    Json(LiveStats {
        timestamp: now,
        users: UserStats {
            total: state.users.count().await,
            active: state.users.count_active().await,
            online: state.broadcaster.registry().count().await,
        },
        posts: PostStats {
            total: state.posts.count().await,
            today: state.posts.count_since(midnight).await,
        },
        comments: TotalStats {
            total: state.comments.count().await,
        },
        messages: TotalStats {
            total: state.messages.count().await,
        },
    })
}
