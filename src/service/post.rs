//! Post service
//!
//! Posts, reactions, comments and messages. Every successful mutation
//! is followed by a domain event.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;

use super::events::{DomainEvent, EventPublisher};
use crate::data::{
    Comment, CommentStore, DEFAULT_REACTION, EntityId, Message, MessageStore, Post, PostStore,
};
use crate::error::AppError;

fn required_text(text: &str, field: &str) -> Result<String, AppError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(text.to_string())
}

/// Post service
pub struct PostService {
    posts: Arc<PostStore>,
    comments: Arc<CommentStore>,
    messages: Arc<MessageStore>,
    events: EventPublisher,
}

impl PostService {
    pub fn new(
        posts: Arc<PostStore>,
        comments: Arc<CommentStore>,
        messages: Arc<MessageStore>,
        events: EventPublisher,
    ) -> Self {
        Self {
            posts,
            comments,
            messages,
            events,
        }
    }

    /// All posts, newest first
    pub async fn list(&self) -> Vec<Post> {
        self.posts.list().await
    }

    pub async fn get(&self, id: &str) -> Result<Post, AppError> {
        self.posts.get(id).await.ok_or(AppError::NotFound)
    }

    pub async fn create(&self, author_id: &str, text: &str) -> Result<Post, AppError> {
        let post = self
            .posts
            .insert(Post {
                id: EntityId::new("post").0,
                author_id: author_id.to_string(),
                text: required_text(text, "text")?,
                created_at: Utc::now(),
                reactions: HashMap::new(),
            })
            .await?;

        tracing::info!(post_id = %post.id, author_id = %author_id, "Post created");
        self.events
            .publish(DomainEvent::PostCreated { post: post.clone() })
            .await;
        Ok(post)
    }

    /// Replace the text of a post; author only
    pub async fn update(&self, id: &str, author_id: &str, text: &str) -> Result<Post, AppError> {
        let text = required_text(text, "text")?;
        let post = self.posts.update_text(id, author_id, text).await?;

        tracing::info!(post_id = %post.id, "Post updated");
        self.events
            .publish(DomainEvent::PostUpdated { post: post.clone() })
            .await;
        Ok(post)
    }

    /// Remove a post; author only
    pub async fn delete(&self, id: &str, author_id: &str) -> Result<(), AppError> {
        let post = self.posts.delete(id, author_id).await?;

        tracing::info!(post_id = %post.id, "Post deleted");
        self.events
            .publish(DomainEvent::PostDeleted { post_id: post.id })
            .await;
        Ok(())
    }

    /// Record `identity`'s reaction, replacing any earlier one
    pub async fn react(
        &self,
        id: &str,
        identity: &str,
        kind: Option<&str>,
    ) -> Result<Post, AppError> {
        let kind = kind
            .map(str::trim)
            .filter(|kind| !kind.is_empty())
            .unwrap_or(DEFAULT_REACTION);
        let post = self.posts.react(id, identity, kind).await?;

        self.events
            .publish(DomainEvent::PostReacted {
                post_id: post.id.clone(),
                user_id: identity.to_string(),
                reaction: kind.to_string(),
            })
            .await;
        Ok(post)
    }

    pub async fn reactions(&self, id: &str) -> Result<HashMap<String, String>, AppError> {
        self.posts.reactions(id).await
    }

    /// Comment on an existing post
    pub async fn add_comment(
        &self,
        post_id: &str,
        author_id: &str,
        text: &str,
    ) -> Result<Comment, AppError> {
        let text = required_text(text, "text")?;
        if !self.posts.exists(post_id).await {
            return Err(AppError::NotFound);
        }

        let comment = self
            .comments
            .append(Comment {
                id: EntityId::new("comment").0,
                post_id: post_id.to_string(),
                author_id: author_id.to_string(),
                text,
                created_at: Utc::now(),
            })
            .await;

        self.events
            .publish(DomainEvent::CommentCreated {
                comment: comment.clone(),
            })
            .await;
        Ok(comment)
    }

    /// Comments on a post, oldest first; empty for unknown posts
    pub async fn comments(&self, post_id: &str) -> Vec<Comment> {
        self.comments.for_post(post_id).await
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.messages.list().await
    }

    pub async fn send_message(&self, author_id: &str, text: &str) -> Result<Message, AppError> {
        let message = self
            .messages
            .append(Message {
                id: EntityId::new("msg").0,
                text: required_text(text, "text")?,
                created_at: Utc::now(),
                author_id: author_id.to_string(),
            })
            .await;

        self.events
            .publish(DomainEvent::MessageCreated {
                message: message.clone(),
            })
            .await;
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{RuntimeConfigPatch, SettingsStore};
    use crate::realtime::{Broadcaster, ConnectionError, ConnectionRegistry, LiveConnection};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Inbox {
        frames: Mutex<Vec<serde_json::Value>>,
    }

    impl LiveConnection for Inbox {
        fn send_text(&self, payload: &str) -> Result<(), ConnectionError> {
            self.frames
                .lock()
                .unwrap()
                .push(serde_json::from_str(payload).unwrap());
            Ok(())
        }

        fn close(&self) {}
    }

    struct Fixture {
        service: PostService,
        settings: Arc<SettingsStore>,
        inbox: Arc<Inbox>,
    }

    async fn fixture() -> Fixture {
        let registry = Arc::new(ConnectionRegistry::new());
        let inbox = Arc::new(Inbox::default());
        registry.register("watcher", inbox.clone()).await;

        let settings = Arc::new(SettingsStore::default());
        let events = EventPublisher::new(Broadcaster::spawn(registry), settings.clone());
        let service = PostService::new(
            Arc::new(PostStore::new()),
            Arc::new(CommentStore::new()),
            Arc::new(MessageStore::new()),
            events,
        );

        Fixture {
            service,
            settings,
            inbox,
        }
    }

    fn event_types(inbox: &Inbox) -> Vec<String> {
        inbox
            .frames
            .lock()
            .unwrap()
            .iter()
            .map(|frame| frame["type"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_mutations_publish_events() {
        let Fixture { service, inbox, .. } = fixture().await;

        let post = service.create("ram", "Morning loop").await.unwrap();
        service.react(&post.id, "hanuma", None).await.unwrap();
        service
            .add_comment(&post.id, "hanuma", "Nice pace")
            .await
            .unwrap();
        service.update(&post.id, "ram", "Morning loop, 40km").await.unwrap();
        service.delete(&post.id, "ram").await.unwrap();
        service.send_message("ram", "hello").await.unwrap();

        assert_eq!(
            event_types(&inbox),
            vec![
                "post.created",
                "post.reacted",
                "comment.created",
                "post.updated",
                "post.deleted",
                "message.created",
            ]
        );
    }

    #[tokio::test]
    async fn test_disabled_realtime_flag_suppresses_events() {
        let Fixture {
            service,
            settings,
            inbox,
        } = fixture().await;
        settings
            .apply(RuntimeConfigPatch {
                features: Some(HashMap::from([("realtime".to_string(), false)])),
                ..Default::default()
            })
            .await;

        service.create("ram", "Quiet ride").await.unwrap();
        assert!(event_types(&inbox).is_empty());
    }

    #[tokio::test]
    async fn test_blank_text_rejected() {
        let Fixture { service, inbox, .. } = fixture().await;

        assert!(matches!(
            service.create("ram", "   ").await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            service.send_message("ram", "").await,
            Err(AppError::Validation(_))
        ));
        assert!(service.list().await.is_empty());
        assert!(event_types(&inbox).is_empty());
    }

    #[tokio::test]
    async fn test_owner_only_mutations() {
        let Fixture { service, .. } = fixture().await;
        let post = service.create("ram", "Mine").await.unwrap();

        assert!(matches!(
            service.update(&post.id, "hanuma", "Hijacked").await,
            Err(AppError::Forbidden)
        ));
        assert!(matches!(
            service.delete(&post.id, "hanuma").await,
            Err(AppError::Forbidden)
        ));
        assert_eq!(service.get(&post.id).await.unwrap().text, "Mine");
    }

    #[tokio::test]
    async fn test_react_defaults_to_like_and_replaces() {
        let Fixture { service, .. } = fixture().await;
        let post = service.create("ram", "React to me").await.unwrap();

        service.react(&post.id, "hanuma", Some("")).await.unwrap();
        assert_eq!(service.reactions(&post.id).await.unwrap()["hanuma"], "like");

        service.react(&post.id, "hanuma", Some("fire")).await.unwrap();
        let reactions = service.reactions(&post.id).await.unwrap();
        assert_eq!(reactions.len(), 1);
        assert_eq!(reactions["hanuma"], "fire");
    }

    #[tokio::test]
    async fn test_comment_on_missing_post() {
        let Fixture { service, .. } = fixture().await;
        assert!(matches!(
            service.add_comment("missing", "ram", "hello?").await,
            Err(AppError::NotFound)
        ));
        assert!(service.comments("missing").await.is_empty());
    }
}
