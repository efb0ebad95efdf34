//! Account service
//!
//! Handles registration, login and profile management.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;

use crate::auth::{TokenIssuer, hash_password, verify_password};
use crate::data::{EntityId, ProfilePatch, User, UserStore};
use crate::error::AppError;

const MIN_PASSWORD_LEN: usize = 6;

/// Registration input
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Registration {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login input
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// A signed-in user together with a fresh token
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Account service
pub struct AccountService {
    users: Arc<UserStore>,
    tokens: Arc<TokenIssuer>,
}

impl AccountService {
    pub fn new(users: Arc<UserStore>, tokens: Arc<TokenIssuer>) -> Self {
        Self { users, tokens }
    }

    /// Create an account and sign it in
    ///
    /// # Errors
    /// `Validation` for missing fields, an email without `@` or a short
    /// password; `Conflict` when the email is already registered
    pub async fn register(&self, registration: Registration) -> Result<Session, AppError> {
        let name = registration.name.trim();
        let email = registration.email.trim();

        if name.is_empty() {
            return Err(AppError::Validation("name is required".to_string()));
        }
        if !email.contains('@') {
            return Err(AppError::Validation("a valid email is required".to_string()));
        }
        if registration.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let password = registration.password;
        let password_hash = run_blocking(move || hash_password(&password)).await??;
        let now = Utc::now();
        let user = self
            .users
            .insert(User {
                id: EntityId::new("user").0,
                name: name.to_string(),
                email: email.to_string(),
                password_hash,
                avatar: generated_avatar(name),
                created_at: now,
                last_login: now,
                is_active: true,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");

        let token = self.tokens.issue_token(&user.id)?;
        Ok(Session { token, user })
    }

    /// Verify credentials and sign the user in
    ///
    /// Unknown email, inactive account and wrong password are
    /// indistinguishable to the caller.
    pub async fn login(&self, credentials: Credentials) -> Result<Session, AppError> {
        let user = self
            .users
            .find_by_email(&credentials.email)
            .await
            .ok_or(AppError::Unauthorized)?;

        let stored_hash = user.password_hash.clone();
        let password = credentials.password;
        let password_ok =
            user.is_active && run_blocking(move || verify_password(&password, &stored_hash)).await?;
        if !password_ok {
            tracing::debug!(user_id = %user.id, "Rejected login");
            return Err(AppError::Unauthorized);
        }

        let user = self
            .users
            .update(&user.id, |user| user.last_login = Utc::now())
            .await?;
        let token = self.tokens.issue_token(&user.id)?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(Session { token, user })
    }

    /// Issue a fresh token for an already authenticated user
    pub fn refresh(&self, user: &User) -> Result<String, AppError> {
        self.tokens.issue_token(&user.id)
    }

    /// Current record of `id`
    pub async fn profile(&self, id: &str) -> Result<User, AppError> {
        self.users.get(id).await.ok_or(AppError::NotFound)
    }

    /// Apply a partial profile update; blank fields are left untouched
    pub async fn update_profile(&self, id: &str, patch: ProfilePatch) -> Result<User, AppError> {
        self.users
            .update(id, |user| {
                if !patch.name.trim().is_empty() {
                    user.name = patch.name.trim().to_string();
                }
                if !patch.avatar.trim().is_empty() {
                    user.avatar = patch.avatar.trim().to_string();
                }
            })
            .await
    }

    /// Active user by id; inactive accounts are reported as missing
    pub async fn get_active(&self, id: &str) -> Result<User, AppError> {
        match self.users.get(id).await {
            Some(user) if user.is_active => Ok(user),
            _ => Err(AppError::NotFound),
        }
    }

    pub async fn list(&self) -> Vec<User> {
        self.users.list_active().await
    }

    pub async fn search(&self, query: &str, limit: usize) -> Vec<User> {
        self.users.search(query, limit).await
    }
}

/// Run CPU-bound argon2 work off the async workers
async fn run_blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| {
        tracing::error!(error = %e, "spawn_blocking join error");
        AppError::Internal(e.into())
    })
}

fn generated_avatar(name: &str) -> String {
    format!(
        "https://ui-avatars.com/api/?name={}&background=FF6B00&color=fff",
        urlencoding::encode(name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AccountService {
        AccountService::new(
            Arc::new(UserStore::new()),
            Arc::new(TokenIssuer::new("0123456789abcdef0123456789abcdef", 3600)),
        )
    }

    fn registration(email: &str) -> Registration {
        Registration {
            name: "Sita Rider".to_string(),
            email: email.to_string(),
            password: "secret1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let service = service();
        let session = service.register(registration("sita@pedal.com")).await.unwrap();
        assert!(session.user.id.starts_with("user_"));
        assert!(session.user.avatar.contains("name=Sita%20Rider"));
        assert_ne!(session.user.password_hash, "secret1");

        let login = service
            .login(Credentials {
                email: "SITA@pedal.com".to_string(),
                password: "secret1".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(login.user.id, session.user.id);
        assert!(login.user.last_login >= session.user.last_login);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_password_hashing_yields_to_other_tasks() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let service = service();
        let ticks = Arc::new(AtomicUsize::new(0));
        let ticker = tokio::spawn({
            let ticks = ticks.clone();
            async move {
                loop {
                    ticks.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(std::time::Duration::from_millis(1)).await;
                }
            }
        });

        service.register(registration("e@pedal.com")).await.unwrap();
        assert!(ticks.load(Ordering::SeqCst) > 0);
        ticker.abort();
    }

    #[tokio::test]
    async fn test_register_validation() {
        let service = service();

        let mut missing_name = registration("a@pedal.com");
        missing_name.name = "  ".to_string();
        let bad_email = registration("not-an-email");
        let mut short_password = registration("b@pedal.com");
        short_password.password = "12345".to_string();

        for input in [missing_name, bad_email, short_password] {
            assert!(matches!(
                service.register(input).await,
                Err(AppError::Validation(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let service = service();
        service.register(registration("dup@pedal.com")).await.unwrap();
        assert!(matches!(
            service.register(registration("dup@pedal.com")).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_wrong_password_is_unauthorized() {
        let service = service();
        service.register(registration("c@pedal.com")).await.unwrap();

        for (email, password) in [("c@pedal.com", "wrong-pass"), ("nobody@pedal.com", "secret1")] {
            let result = service
                .login(Credentials {
                    email: email.to_string(),
                    password: password.to_string(),
                })
                .await;
            assert!(matches!(result, Err(AppError::Unauthorized)));
        }
    }

    #[tokio::test]
    async fn test_update_profile_is_partial() {
        let service = service();
        let session = service.register(registration("d@pedal.com")).await.unwrap();

        let updated = service
            .update_profile(
                &session.user.id,
                ProfilePatch {
                    name: String::new(),
                    avatar: "https://example.com/me.png".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Sita Rider");
        assert_eq!(updated.avatar, "https://example.com/me.png");
    }
}
