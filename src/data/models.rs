//! Data models
//!
//! Rust structs for the in-memory entities. IDs are prefixed ULIDs,
//! timestamps are chrono UTC. JSON keys are camelCase to match the
//! wire format the web client expects.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// ID Types
// =============================================================================

/// Entity ID wrapper (`{prefix}_{ulid}`)
///
/// Example: "post_01arz3ndektsv4rrffq69g5fav"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    /// Generate a new ID with the given kind prefix
    pub fn new(prefix: &str) -> Self {
        Self(format!(
            "{}_{}",
            prefix,
            ulid::Ulid::new().to_string().to_ascii_lowercase()
        ))
    }
}

// =============================================================================
// User
// =============================================================================

/// A registered account
///
/// `id` is the account's identity: opaque, unique, immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Argon2 PHC string; never serialized
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
    pub is_active: bool,
}

/// Partial profile update; empty fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePatch {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub avatar: String,
}

// =============================================================================
// Post
// =============================================================================

/// Default reaction when the client does not name one
pub const DEFAULT_REACTION: &str = "like";

/// A post, with reactions keyed by reacting identity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub author_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    /// identity -> reaction kind
    pub reactions: HashMap<String, String>,
}

/// A comment on a post
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub author_id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Chat-style message (append-only)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub author_id: String,
}

// =============================================================================
// Runtime configuration
// =============================================================================

/// Feature flag gating domain event broadcasts
pub const REALTIME_FEATURE: &str = "realtime";

/// Runtime-tunable application settings (singleton)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeConfig {
    pub app_name: String,
    pub version: String,
    pub max_users: u32,
    pub rate_limit: u32,
    pub maintenance_mode: bool,
    pub features: HashMap<String, bool>,
}

impl RuntimeConfig {
    pub fn feature_enabled(&self, name: &str) -> bool {
        self.features.get(name).copied().unwrap_or(false)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        let features = [
            ("websocket", true),
            ("realtime", true),
            ("comments", true),
            ("reactions", true),
            ("fileUpload", false),
            ("notifications", true),
        ]
        .into_iter()
        .map(|(name, enabled)| (name.to_string(), enabled))
        .collect();

        Self {
            app_name: "PEDAL Backend".to_string(),
            version: "2.0.0".to_string(),
            max_users: 10_000,
            rate_limit: 20,
            maintenance_mode: false,
            features,
        }
    }
}

/// Partial update for [`RuntimeConfig`]
///
/// Only non-empty strings and non-zero numbers overwrite; feature flags
/// merge key by key. `maintenance_mode` is left alone when absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuntimeConfigPatch {
    pub app_name: String,
    pub version: String,
    pub max_users: u32,
    pub rate_limit: u32,
    pub maintenance_mode: Option<bool>,
    pub features: Option<HashMap<String, bool>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_ids_carry_prefix_and_are_unique() {
        let a = EntityId::new("post");
        let b = EntityId::new("post");
        assert!(a.0.starts_with("post_"));
        assert_ne!(a, b);
    }

    #[test]
    fn user_serialization_hides_password_hash() {
        let now = Utc::now();
        let user = User {
            id: "ram".to_string(),
            name: "Ram".to_string(),
            email: "ram@pedal.com".to_string(),
            password_hash: "secret-hash".to_string(),
            avatar: String::new(),
            created_at: now,
            last_login: now,
            is_active: true,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["isActive"], true);
        assert!(json.get("lastLogin").is_some());
    }

    #[test]
    fn config_patch_accepts_partial_body() {
        let patch: RuntimeConfigPatch = serde_json::from_str(r#"{"maxUsers": 500}"#).unwrap();
        assert_eq!(patch.max_users, 500);
        assert!(patch.app_name.is_empty());
        assert!(patch.maintenance_mode.is_none());
        assert!(patch.features.is_none());
    }
}
