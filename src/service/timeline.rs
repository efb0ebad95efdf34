//! Timeline service
//!
//! Follow graph operations and the personal feed.

use std::collections::HashSet;
use std::sync::Arc;

use crate::data::{FollowStore, Post, PostStore, UserStore};
use crate::error::AppError;

/// Timeline service
pub struct TimelineService {
    users: Arc<UserStore>,
    follows: Arc<FollowStore>,
    posts: Arc<PostStore>,
}

impl TimelineService {
    pub fn new(users: Arc<UserStore>, follows: Arc<FollowStore>, posts: Arc<PostStore>) -> Self {
        Self {
            users,
            follows,
            posts,
        }
    }

    /// Posts by `identity` and everyone it follows, newest first
    ///
    /// The follow set is copied out before the post store is read, so the
    /// two locks are never held together.
    pub async fn feed(&self, identity: &str) -> Vec<Post> {
        let mut authors: HashSet<String> = self.follows.following(identity).await;
        authors.insert(identity.to_string());
        self.posts.by_authors(&authors).await
    }

    /// Follow an existing user; following twice is a no-op
    ///
    /// # Errors
    /// `NotFound` when `target` is not a registered user
    pub async fn follow(&self, follower: &str, target: &str) -> Result<(), AppError> {
        if !self.users.exists(target).await {
            return Err(AppError::NotFound);
        }
        if self.follows.follow(follower, target).await {
            tracing::info!(follower = %follower, target = %target, "Follow added");
        }
        Ok(())
    }

    /// Always succeeds, whether or not the edge existed
    pub async fn unfollow(&self, follower: &str, target: &str) {
        if self.follows.unfollow(follower, target).await {
            tracing::info!(follower = %follower, target = %target, "Follow removed");
        }
    }

    /// Identities `identity` follows, sorted
    pub async fn following(&self, identity: &str) -> Vec<String> {
        sorted(self.follows.following(identity).await)
    }

    /// Identities following `identity`, sorted
    pub async fn followers(&self, identity: &str) -> Vec<String> {
        sorted(self.follows.followers(identity).await)
    }
}

fn sorted(identities: HashSet<String>) -> Vec<String> {
    let mut identities: Vec<String> = identities.into_iter().collect();
    identities.sort();
    identities
}
