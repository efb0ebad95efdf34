//! Domain event publishing
//!
//! Successful mutations are announced to every live connection while the
//! `realtime` feature flag is on. Events are published after the store
//! write has completed, so no store lock is held during fan-out.

use std::sync::Arc;

use serde::Serialize;

use crate::data::{Comment, Message, Post, REALTIME_FEATURE, SettingsStore};
use crate::realtime::Broadcaster;

/// Wire shape: `{"type": "post.created", ...}`
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum DomainEvent {
    #[serde(rename = "post.created")]
    PostCreated { post: Post },

    #[serde(rename = "post.updated")]
    PostUpdated { post: Post },

    #[serde(rename = "post.deleted", rename_all = "camelCase")]
    PostDeleted { post_id: String },

    #[serde(rename = "post.reacted", rename_all = "camelCase")]
    PostReacted {
        post_id: String,
        user_id: String,
        reaction: String,
    },

    #[serde(rename = "comment.created")]
    CommentCreated { comment: Comment },

    #[serde(rename = "message.created")]
    MessageCreated { message: Message },
}

/// Feature-gated front for the broadcaster
#[derive(Clone)]
pub struct EventPublisher {
    broadcaster: Broadcaster,
    settings: Arc<SettingsStore>,
}

impl EventPublisher {
    pub fn new(broadcaster: Broadcaster, settings: Arc<SettingsStore>) -> Self {
        Self {
            broadcaster,
            settings,
        }
    }

    /// Broadcast `event` unless real-time delivery is switched off
    pub async fn publish(&self, event: DomainEvent) {
        if !self.settings.feature_enabled(REALTIME_FEATURE).await {
            return;
        }
        self.broadcaster.broadcast(&event).await;
    }
}
