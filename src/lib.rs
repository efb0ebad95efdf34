//! PEDAL - social backend for riders
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      API Layer (Axum)                        │
//! │  - Auth, users, social, config endpoints                    │
//! │  - WebSocket sessions                                       │
//! │  - Admin/health endpoints                                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Service Layer                            │
//! │  - Business logic                                           │
//! │  - Domain event publishing                                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌──────────────────────────────┬──────────────────────────────┐
//! │          Data Layer          │         Realtime             │
//! │  - In-memory entity stores   │  - Connection registry       │
//! │  - Demo seed                 │  - Broadcast + eviction      │
//! └──────────────────────────────┴──────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - `api`: HTTP handlers
//! - `service`: Business logic layer
//! - `data`: Entity stores
//! - `realtime`: Live connections and broadcast fan-out
//! - `storage`: Optional PostgreSQL/Redis health probes
//! - `auth`: Password hashing and bearer tokens
//! - `config`: Configuration management
//! - `error`: Error types

pub mod api;
pub mod auth;
pub mod config;
pub mod data;
pub mod error;
pub mod realtime;
pub mod service;
pub mod storage;

use std::sync::Arc;

/// Application state shared across all handlers
///
/// Cloned for each request; every store sits behind its own `Arc` and
/// its own lock.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<config::AppConfig>,

    pub users: Arc<data::UserStore>,
    pub posts: Arc<data::PostStore>,
    pub comments: Arc<data::CommentStore>,
    pub messages: Arc<data::MessageStore>,
    pub follows: Arc<data::FollowStore>,

    /// Runtime-tunable settings (feature flags etc.)
    pub settings: Arc<data::SettingsStore>,

    /// Fan-out to live connections; owns the connection registry
    pub broadcaster: realtime::Broadcaster,

    /// Bearer token signer
    pub tokens: Arc<auth::TokenIssuer>,

    /// Optional database/cache liveness probes
    pub probes: storage::DependencyProbes,
}

impl AppState {
    /// Initialize application state
    ///
    /// # Steps
    /// 1. Set up the token signer
    /// 2. Configure dependency probes (no connection is made yet)
    /// 3. Create the stores and the broadcaster
    /// 4. Seed demo data if enabled
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    /// Returns error if a dependency URL is invalid or seeding fails
    pub async fn new(config: config::AppConfig) -> Result<Self, error::AppError> {
        tracing::info!("Initializing application state...");

        // 1. Token signer
        let secret = match &config.auth.token_secret {
            Some(secret) => secret.as_bytes().to_vec(),
            None => {
                tracing::warn!("auth.token_secret is not set; generating an ephemeral secret");
                auth::generate_secret()
            }
        };
        let tokens = auth::TokenIssuer::new(secret, config.auth.token_ttl_seconds);

        // 2. Dependency probes
        let probes = storage::DependencyProbes::connect(&config)?;

        // 3. Stores and broadcaster
        let users = Arc::new(data::UserStore::new());
        let posts = Arc::new(data::PostStore::new());
        let follows = Arc::new(data::FollowStore::new());
        let registry = Arc::new(realtime::ConnectionRegistry::new());
        let broadcaster = realtime::Broadcaster::spawn(registry);

        // 4. Demo data
        if config.seed.demo_data {
            data::seed_demo_data(&users, &follows, &posts).await?;
        }

        tracing::info!("Application state initialized successfully");

        Ok(Self {
            config: Arc::new(config),
            users,
            posts,
            comments: Arc::new(data::CommentStore::new()),
            messages: Arc::new(data::MessageStore::new()),
            follows,
            settings: Arc::new(data::SettingsStore::default()),
            broadcaster,
            tokens: Arc::new(tokens),
            probes,
        })
    }

    pub fn account_service(&self) -> service::AccountService {
        service::AccountService::new(self.users.clone(), self.tokens.clone())
    }

    pub fn post_service(&self) -> service::PostService {
        service::PostService::new(
            self.posts.clone(),
            self.comments.clone(),
            self.messages.clone(),
            self.event_publisher(),
        )
    }

    pub fn timeline_service(&self) -> service::TimelineService {
        service::TimelineService::new(self.users.clone(), self.follows.clone(), self.posts.clone())
    }

    pub fn event_publisher(&self) -> service::EventPublisher {
        service::EventPublisher::new(self.broadcaster.clone(), self.settings.clone())
    }
}

/// Build the Axum router with all routes.
///
/// This is shared by the binary and integration tests to keep route
/// composition consistent across environments.
pub fn build_router(state: AppState) -> axum::Router {
    use axum::Router;
    use tower_http::trace::TraceLayer;

    Router::new()
        .nest("/api", api::api_router())
        .merge(api::realtime_router())
        .nest("/admin", api::admin_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
