//! User store
//!
//! Users keyed by identity, with a lower-cased email index kept under
//! the same lock so uniqueness checks and inserts are atomic.

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::models::User;
use crate::error::AppError;

#[derive(Default)]
struct UserTable {
    /// identity -> user
    by_id: HashMap<String, User>,
    /// normalized email -> identity
    by_email: HashMap<String, String>,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Concurrency-safe user store
#[derive(Default)]
pub struct UserStore {
    table: RwLock<UserTable>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new user
    ///
    /// # Errors
    /// `Conflict` if the identity or the email is already taken
    pub async fn insert(&self, user: User) -> Result<User, AppError> {
        let email_key = normalize_email(&user.email);
        let mut table = self.table.write().await;

        if table.by_email.contains_key(&email_key) {
            return Err(AppError::Conflict("user already exists".to_string()));
        }
        if table.by_id.contains_key(&user.id) {
            return Err(AppError::Conflict("identity already taken".to_string()));
        }

        table.by_email.insert(email_key, user.id.clone());
        table.by_id.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    /// Get user by identity
    pub async fn get(&self, id: &str) -> Option<User> {
        self.table.read().await.by_id.get(id).cloned()
    }

    /// Whether an account with this identity exists
    pub async fn exists(&self, id: &str) -> bool {
        self.table.read().await.by_id.contains_key(id)
    }

    /// Look up a user by email (case-insensitive)
    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        let table = self.table.read().await;
        table
            .by_email
            .get(&normalize_email(email))
            .and_then(|id| table.by_id.get(id))
            .cloned()
    }

    /// Read-modify-write a user under a single write lock
    ///
    /// The closure sees the current record, so concurrent updates to the
    /// same user never lose each other's fields. Email is not editable
    /// through this path.
    pub async fn update<F>(&self, id: &str, apply: F) -> Result<User, AppError>
    where
        F: FnOnce(&mut User),
    {
        let mut table = self.table.write().await;
        let user = table.by_id.get_mut(id).ok_or(AppError::NotFound)?;
        let email = user.email.clone();
        apply(user);
        user.email = email;
        Ok(user.clone())
    }

    /// All active users, ordered by creation time
    pub async fn list_active(&self) -> Vec<User> {
        let mut users: Vec<User> = self
            .table
            .read()
            .await
            .by_id
            .values()
            .filter(|user| user.is_active)
            .cloned()
            .collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        users
    }

    /// Case-insensitive substring search over name and email
    ///
    /// An empty query matches every active user.
    pub async fn search(&self, query: &str, limit: usize) -> Vec<User> {
        let needle = query.trim().to_lowercase();
        self.list_active()
            .await
            .into_iter()
            .filter(|user| {
                needle.is_empty()
                    || user.name.to_lowercase().contains(&needle)
                    || user.email.to_lowercase().contains(&needle)
            })
            .take(limit)
            .collect()
    }

    pub async fn count(&self) -> usize {
        self.table.read().await.by_id.len()
    }

    pub async fn count_active(&self) -> usize {
        self.table
            .read()
            .await
            .by_id
            .values()
            .filter(|user| user.is_active)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(id: &str, name: &str, email: &str) -> User {
        let now = Utc::now();
        User {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: String::new(),
            avatar: String::new(),
            created_at: now,
            last_login: now,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let store = UserStore::new();
        store
            .insert(user("ram", "Ram", "ram@pedal.com"))
            .await
            .unwrap();

        assert!(store.exists("ram").await);
        assert_eq!(store.get("ram").await.unwrap().name, "Ram");
        assert_eq!(
            store.find_by_email("RAM@pedal.com").await.unwrap().id,
            "ram"
        );
        assert!(store.find_by_email("nobody@pedal.com").await.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let store = UserStore::new();
        store
            .insert(user("ram", "Ram", "ram@pedal.com"))
            .await
            .unwrap();

        let error = store
            .insert(user("ram2", "Ram Two", "ram@pedal.com"))
            .await
            .expect_err("duplicate email must fail");
        assert!(matches!(error, AppError::Conflict(_)));
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_registration_with_same_email_admits_one() {
        let store = std::sync::Arc::new(UserStore::new());
        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .insert(user(&format!("u{i}"), "Same", "same@pedal.com"))
                    .await
                    .is_ok()
            }));
        }

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 1);
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn test_update_keeps_email_and_other_fields() {
        let store = UserStore::new();
        store
            .insert(user("ram", "Ram", "ram@pedal.com"))
            .await
            .unwrap();

        let updated = store
            .update("ram", |u| {
                u.name = "Ram K".to_string();
                u.email = "hijack@pedal.com".to_string();
            })
            .await
            .unwrap();
        assert_eq!(updated.name, "Ram K");
        assert_eq!(updated.email, "ram@pedal.com");

        assert!(matches!(
            store.update("ghost", |_| {}).await,
            Err(AppError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_search_skips_inactive_and_respects_limit() {
        let store = UserStore::new();
        store
            .insert(user("ram", "Ram", "ram@pedal.com"))
            .await
            .unwrap();
        store
            .insert(user("hanuma", "Hanuma", "hanuma@pedal.com"))
            .await
            .unwrap();
        let mut hidden = user("ghost", "Ghost Rider", "ghost@pedal.com");
        hidden.is_active = false;
        store.insert(hidden).await.unwrap();

        assert_eq!(store.search("", 10).await.len(), 2);
        assert_eq!(store.search("pedal.com", 1).await.len(), 1);
        assert_eq!(store.search("HANU", 10).await[0].id, "hanuma");
        assert!(store.search("ghost", 10).await.is_empty());
        assert_eq!(store.count().await, 3);
        assert_eq!(store.count_active().await, 2);
    }
}
