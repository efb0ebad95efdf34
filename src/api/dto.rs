//! Request and response DTOs
//!
//! JSON keys follow the web client: camelCase for entities,
//! snake_case for the admin/status counters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data::{Post, User};
use crate::storage::ProbeStatus;

// =============================================================================
// Auth
// =============================================================================

/// Public part of a user returned alongside a token
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            avatar: user.avatar,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub expires_in: i64,
    pub user: UserSummary,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub expires_in: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// =============================================================================
// Users
// =============================================================================

pub const DEFAULT_SEARCH_LIMIT: usize = 10;
pub const MAX_SEARCH_LIMIT: usize = 100;

/// Query for GET /api/users/search
///
/// `limit` is kept as text: anything that is not an integer in
/// `1..=100` falls back to the default instead of failing the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub limit: Option<String>,
}

impl SearchParams {
    pub fn limit(&self) -> usize {
        self.limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|limit| (1..=MAX_SEARCH_LIMIT).contains(limit))
            .unwrap_or(DEFAULT_SEARCH_LIMIT)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub users: Vec<User>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct IdentityListResponse {
    pub users: Vec<String>,
    pub count: usize,
}

impl From<Vec<String>> for IdentityListResponse {
    fn from(users: Vec<String>) -> Self {
        Self {
            count: users.len(),
            users,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

// =============================================================================
// Social
// =============================================================================

/// Body carrying a single text field (posts, comments, messages)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReactRequest {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReactionsResponse {
    pub reactions: std::collections::HashMap<String, String>,
}

pub type FeedResponse = Vec<Post>;

// =============================================================================
// Realtime / stats
// =============================================================================

/// Query for GET /ws
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WsParams {
    pub user_id: Option<String>,
}

pub const ANONYMOUS_IDENTITY: &str = "anonymous";

impl WsParams {
    pub fn identity(self) -> String {
        self.user_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| ANONYMOUS_IDENTITY.to_string())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LiveStats {
    pub timestamp: DateTime<Utc>,
    pub users: UserStats,
    pub posts: PostStats,
    pub comments: TotalStats,
    pub messages: TotalStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserStats {
    pub total: usize,
    pub active: usize,
    pub online: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostStats {
    pub total: usize,
    pub today: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TotalStats {
    pub total: usize,
}

// =============================================================================
// Health / admin
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub time: DateTime<Utc>,
    pub db: ProbeStatus,
    pub redis: ProbeStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminStats {
    pub version: String,
    pub time: DateTime<Utc>,
    pub db: ProbeStatus,
    pub redis: ProbeStatus,
    pub messages_count: usize,
    pub users_count: usize,
    pub posts_count: usize,
    pub comments_count: usize,
    pub online_count: usize,
}
