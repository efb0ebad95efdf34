//! API layer
//!
//! HTTP handlers for:
//! - Auth and user accounts
//! - Social graph, posts and messages
//! - Runtime configuration and live stats
//! - WebSocket sessions
//! - Admin status

mod admin;
mod auth;
mod dto;
mod health;
mod realtime;
mod settings;
mod social;
mod users;

use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;

pub use admin::admin_router;
pub use dto::*;

/// Routes mounted under `/api`
///
/// Routes are split into public and authenticated endpoints; the
/// authenticated ones take a `CurrentUser` extractor.
pub fn api_router() -> Router<AppState> {
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
        .route("/profile", get(auth::profile));

    let user_routes = Router::new()
        .route("/", get(users::list_users))
        .route("/search", get(users::search_users))
        .route("/me", get(users::me).put(users::update_me))
        .route("/:id", get(users::get_user))
        .route("/:id/following", get(users::following))
        .route("/:id/followers", get(users::followers))
        .route("/:id/follow", post(users::follow).delete(users::unfollow));

    let social_routes = Router::new()
        .route("/feed", get(social::feed))
        .route("/posts", get(social::list_posts).post(social::create_post))
        .route(
            "/posts/:id",
            get(social::get_post)
                .put(social::update_post)
                .delete(social::delete_post),
        )
        .route("/posts/:id/react", post(social::react))
        .route("/posts/:id/reactions", get(social::reactions))
        .route(
            "/posts/:id/comments",
            get(social::comments).post(social::add_comment),
        );

    Router::new()
        .route("/health", get(health::health))
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/social", social_routes)
        .route(
            "/messages",
            get(social::list_messages).post(social::create_message),
        )
        .route("/stats/live", get(realtime::live_stats))
        .route(
            "/config",
            get(settings::get_config).put(settings::update_config),
        )
}

/// Real-time session route, mounted at the root
pub fn realtime_router() -> Router<AppState> {
    Router::new().route("/ws", get(realtime::websocket))
}
