//! Data layer module
//!
//! In-memory entity stores. Every store owns its own reader/writer
//! lock; no operation holds two stores' locks at the same time.
//! - Users (with email index)
//! - Posts (newest first)
//! - Comments and messages (append-only)
//! - Follow edges
//! - Runtime configuration

mod comments;
mod follows;
mod models;
mod posts;
mod seed;
mod settings;
mod users;

pub use comments::{CommentStore, MessageStore};
pub use follows::FollowStore;
pub use models::*;
pub use posts::PostStore;
pub use seed::seed_demo_data;
pub use settings::SettingsStore;
pub use users::UserStore;
