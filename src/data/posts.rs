//! Post store
//!
//! Posts are kept newest first: creation prepends.

use std::collections::{HashMap, HashSet, VecDeque};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::models::Post;
use crate::error::AppError;

/// Concurrency-safe post store
#[derive(Default)]
pub struct PostStore {
    posts: RwLock<VecDeque<Post>>,
}

impl PostStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a post
    ///
    /// # Errors
    /// `Conflict` if a post with the same id already exists
    pub async fn insert(&self, post: Post) -> Result<Post, AppError> {
        let mut posts = self.posts.write().await;
        if posts.iter().any(|p| p.id == post.id) {
            return Err(AppError::Conflict(format!("post {} already exists", post.id)));
        }
        posts.push_front(post.clone());
        Ok(post)
    }

    /// All posts, newest first
    pub async fn list(&self) -> Vec<Post> {
        self.posts.read().await.iter().cloned().collect()
    }

    pub async fn get(&self, id: &str) -> Option<Post> {
        self.posts.read().await.iter().find(|p| p.id == id).cloned()
    }

    pub async fn exists(&self, id: &str) -> bool {
        self.posts.read().await.iter().any(|p| p.id == id)
    }

    /// Replace the text of a post owned by `author_id`
    ///
    /// # Errors
    /// `NotFound` for an unknown post, `Forbidden` when `author_id` is not the author
    pub async fn update_text(
        &self,
        id: &str,
        author_id: &str,
        text: String,
    ) -> Result<Post, AppError> {
        let mut posts = self.posts.write().await;
        let post = posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(AppError::NotFound)?;
        if post.author_id != author_id {
            return Err(AppError::Forbidden);
        }
        post.text = text;
        Ok(post.clone())
    }

    /// Remove a post owned by `author_id`
    pub async fn delete(&self, id: &str, author_id: &str) -> Result<Post, AppError> {
        let mut posts = self.posts.write().await;
        let index = posts
            .iter()
            .position(|p| p.id == id)
            .ok_or(AppError::NotFound)?;
        if posts[index].author_id != author_id {
            return Err(AppError::Forbidden);
        }
        posts.remove(index).ok_or(AppError::NotFound)
    }

    /// Set `identity`'s reaction on a post, replacing any previous one
    pub async fn react(&self, id: &str, identity: &str, kind: &str) -> Result<Post, AppError> {
        let mut posts = self.posts.write().await;
        let post = posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(AppError::NotFound)?;
        post.reactions
            .insert(identity.to_string(), kind.to_string());
        Ok(post.clone())
    }

    /// Reaction map of a post
    pub async fn reactions(&self, id: &str) -> Result<HashMap<String, String>, AppError> {
        self.posts
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.reactions.clone())
            .ok_or(AppError::NotFound)
    }

    /// Posts by any of `authors`, in store order
    pub async fn by_authors(&self, authors: &HashSet<String>) -> Vec<Post> {
        self.posts
            .read()
            .await
            .iter()
            .filter(|p| authors.contains(&p.author_id))
            .cloned()
            .collect()
    }

    pub async fn count(&self) -> usize {
        self.posts.read().await.len()
    }

    /// Posts created at or after `since`
    pub async fn count_since(&self, since: DateTime<Utc>) -> usize {
        self.posts
            .read()
            .await
            .iter()
            .filter(|p| p.created_at >= since)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::EntityId;
    use std::sync::Arc;

    fn post(id: &str, author: &str, text: &str) -> Post {
        Post {
            id: id.to_string(),
            author_id: author.to_string(),
            text: text.to_string(),
            created_at: Utc::now(),
            reactions: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn test_insert_prepends() {
        let store = PostStore::new();
        store.insert(post("p-1", "ram", "first")).await.unwrap();
        store.insert(post("p-2", "ram", "second")).await.unwrap();

        let ids: Vec<String> = store.list().await.into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["p-2", "p-1"]);
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let store = PostStore::new();
        store.insert(post("p-1", "ram", "first")).await.unwrap();
        assert!(matches!(
            store.insert(post("p-1", "hanuma", "again")).await,
            Err(AppError::Conflict(_))
        ));
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_creates_keep_every_post() {
        let store = Arc::new(PostStore::new());
        let mut handles = Vec::new();
        for i in 0..64 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let author = format!("rider-{}", i % 8);
                store
                    .insert(post(&EntityId::new("post").0, &author, "ride"))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let posts = store.list().await;
        assert_eq!(posts.len(), 64);
        let unique: HashSet<_> = posts.iter().map(|p| p.id.clone()).collect();
        assert_eq!(unique.len(), 64);
    }

    #[tokio::test]
    async fn test_only_author_may_edit_or_delete() {
        let store = PostStore::new();
        store.insert(post("p-1", "ram", "first")).await.unwrap();

        assert!(matches!(
            store.update_text("p-1", "hanuma", "mine now".into()).await,
            Err(AppError::Forbidden)
        ));
        assert!(matches!(
            store.delete("p-1", "hanuma").await,
            Err(AppError::Forbidden)
        ));
        assert!(matches!(
            store.update_text("p-9", "ram", "x".into()).await,
            Err(AppError::NotFound)
        ));

        let edited = store
            .update_text("p-1", "ram", "edited".into())
            .await
            .unwrap();
        assert_eq!(edited.text, "edited");

        store.delete("p-1", "ram").await.unwrap();
        assert!(!store.exists("p-1").await);
    }

    #[tokio::test]
    async fn test_reaction_replaces_previous_kind() {
        let store = PostStore::new();
        store.insert(post("p1", "ram", "ride")).await.unwrap();

        store.react("p1", "hanuma", "like").await.unwrap();
        assert_eq!(
            store.reactions("p1").await.unwrap(),
            HashMap::from([("hanuma".to_string(), "like".to_string())])
        );

        store.react("p1", "hanuma", "fire").await.unwrap();
        let reactions = store.reactions("p1").await.unwrap();
        assert_eq!(reactions.len(), 1);
        assert_eq!(reactions["hanuma"], "fire");

        assert!(matches!(
            store.reactions("missing").await,
            Err(AppError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_by_authors_preserves_order() {
        let store = PostStore::new();
        store.insert(post("p-1", "ram", "a")).await.unwrap();
        store.insert(post("p-2", "dummy", "b")).await.unwrap();
        store.insert(post("p-3", "hanuma", "c")).await.unwrap();

        let authors = HashSet::from(["ram".to_string(), "hanuma".to_string()]);
        let ids: Vec<String> = store
            .by_authors(&authors)
            .await
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["p-3", "p-1"]);
    }
}
