//! Demo data
//!
//! Seeds the three demo riders, their follow edges and two posts.
//! Demo accounts carry no password hash, so they cannot log in.

use std::collections::HashMap;

use chrono::{Duration, Utc};

use super::{FollowStore, Post, PostStore, User, UserStore};
use crate::error::AppError;

/// Populate empty stores with the demo data set
pub async fn seed_demo_data(
    users: &UserStore,
    follows: &FollowStore,
    posts: &PostStore,
) -> Result<(), AppError> {
    let now = Utc::now();

    let riders = [
        ("ram", "Ram", "ram@pedal.com", 12, Duration::days(30), Duration::hours(1)),
        (
            "hanuma",
            "Hanuma",
            "hanuma@pedal.com",
            13,
            Duration::days(20),
            Duration::hours(2),
        ),
        (
            "dummy",
            "Demo User",
            "demo@pedal.com",
            14,
            Duration::days(10),
            Duration::minutes(30),
        ),
    ];

    for (id, name, email, avatar, age, last_seen) in riders {
        users
            .insert(User {
                id: id.to_string(),
                name: name.to_string(),
                email: email.to_string(),
                password_hash: String::new(),
                avatar: format!("https://i.pravatar.cc/100?img={avatar}"),
                created_at: now - age,
                last_login: now - last_seen,
                is_active: true,
            })
            .await?;
    }

    for (follower, target) in [
        ("ram", "hanuma"),
        ("hanuma", "ram"),
        ("dummy", "ram"),
        ("dummy", "hanuma"),
    ] {
        follows.follow(follower, target).await;
    }

    // Oldest first; insertion prepends, so the newest ends up on top.
    let demo_posts = [
        (
            "p-1",
            "ram",
            "First ride of the season!",
            Duration::hours(2),
            "hanuma",
        ),
        (
            "p-2",
            "hanuma",
            "Trail condition looks perfect today.",
            Duration::minutes(90),
            "ram",
        ),
    ];
    for (id, author, text, age, reactor) in demo_posts {
        posts
            .insert(Post {
                id: id.to_string(),
                author_id: author.to_string(),
                text: text.to_string(),
                created_at: now - age,
                reactions: HashMap::from([(reactor.to_string(), "like".to_string())]),
            })
            .await?;
    }

    tracing::info!(
        users = users.count().await,
        posts = posts.count().await,
        "Demo data seeded"
    );

    Ok(())
}
