//! Comment and message stores (append-only sequences)

use tokio::sync::RwLock;

use super::models::{Comment, Message};

/// Concurrency-safe comment store
///
/// Post ids are not re-validated here; callers check the post store
/// before appending.
#[derive(Default)]
pub struct CommentStore {
    comments: RwLock<Vec<Comment>>,
}

impl CommentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn append(&self, comment: Comment) -> Comment {
        self.comments.write().await.push(comment.clone());
        comment
    }

    /// Comments on a post, oldest first
    pub async fn for_post(&self, post_id: &str) -> Vec<Comment> {
        self.comments
            .read()
            .await
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect()
    }

    pub async fn count(&self) -> usize {
        self.comments.read().await.len()
    }
}

/// Concurrency-safe message store
#[derive(Default)]
pub struct MessageStore {
    messages: RwLock<Vec<Message>>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn append(&self, message: Message) -> Message {
        self.messages.write().await.push(message.clone());
        message
    }

    /// All messages, oldest first
    pub async fn list(&self) -> Vec<Message> {
        self.messages.read().await.clone()
    }

    pub async fn count(&self) -> usize {
        self.messages.read().await.len()
    }
}
