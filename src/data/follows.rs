//! Follow-edge store
//!
//! Directed edges: follower -> set of followed identities.

use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;

/// Concurrency-safe follow graph
#[derive(Default)]
pub struct FollowStore {
    edges: RwLock<HashMap<String, HashSet<String>>>,
}

impl FollowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an edge; returns false if it already existed
    pub async fn follow(&self, follower: &str, target: &str) -> bool {
        self.edges
            .write()
            .await
            .entry(follower.to_string())
            .or_default()
            .insert(target.to_string())
    }

    /// Remove an edge; returns false if there was none
    pub async fn unfollow(&self, follower: &str, target: &str) -> bool {
        let mut edges = self.edges.write().await;
        let Some(targets) = edges.get_mut(follower) else {
            return false;
        };
        let removed = targets.remove(target);
        if targets.is_empty() {
            edges.remove(follower);
        }
        removed
    }

    /// Copy of the identities `follower` follows
    pub async fn following(&self, follower: &str) -> HashSet<String> {
        self.edges
            .read()
            .await
            .get(follower)
            .cloned()
            .unwrap_or_default()
    }

    /// Identities that follow `target`
    pub async fn followers(&self, target: &str) -> HashSet<String> {
        self.edges
            .read()
            .await
            .iter()
            .filter(|(_, targets)| targets.contains(target))
            .map(|(follower, _)| follower.clone())
            .collect()
    }

    pub async fn is_following(&self, follower: &str, target: &str) -> bool {
        self.edges
            .read()
            .await
            .get(follower)
            .is_some_and(|targets| targets.contains(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_follow_is_directed_and_idempotent() {
        let store = FollowStore::new();
        assert!(store.follow("ram", "hanuma").await);
        assert!(!store.follow("ram", "hanuma").await);

        assert!(store.is_following("ram", "hanuma").await);
        assert!(!store.is_following("hanuma", "ram").await);
        assert_eq!(
            store.followers("hanuma").await,
            HashSet::from(["ram".to_string()])
        );
    }

    #[tokio::test]
    async fn test_unfollow_missing_edge_is_noop() {
        let store = FollowStore::new();
        assert!(!store.unfollow("ram", "hanuma").await);

        store.follow("ram", "hanuma").await;
        assert!(store.unfollow("ram", "hanuma").await);
        assert!(!store.unfollow("ram", "hanuma").await);
        assert!(store.following("ram").await.is_empty());
    }
}
