//! Common test utilities for E2E tests

#![allow(dead_code)]

use pedal::{AppState, config};
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Test server instance
pub struct TestServer {
    pub addr: String,
    pub state: AppState,
    pub client: reqwest::Client,
}

/// Account created through the public registration endpoint
pub struct TestUser {
    pub id: String,
    pub email: String,
    pub token: String,
}

impl TestServer {
    /// Create a new test server seeded with the demo data set
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: config::AppConfig) -> Self {
        // Initialize app state
        let state = AppState::new(config).await.unwrap();

        // Create HTTP client
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap();

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let app = pedal::build_router(state.clone());

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr: addr.to_string(),
            state,
            client,
        }
    }

    /// Get base URL for API requests
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// WebSocket URL for `/ws`
    pub fn ws_url(&self, user_id: Option<&str>) -> String {
        match user_id {
            Some(user_id) => format!("ws://{}/ws?user_id={}", self.addr, user_id),
            None => format!("ws://{}/ws", self.addr),
        }
    }

    /// Register a fresh account and return its token
    pub async fn register_user(&self, name: &str, email: &str) -> TestUser {
        let response = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&json!({
                "name": name,
                "email": email,
                "password": "pedal-pass",
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 201, "registration of {email} failed");

        let body: Value = response.json().await.unwrap();
        TestUser {
            id: body["user"]["id"].as_str().unwrap().to_string(),
            email: email.to_string(),
            token: body["token"].as_str().unwrap().to_string(),
        }
    }

    /// Token for a seeded account; demo accounts have no password
    pub fn token_for(&self, identity: &str) -> String {
        self.state.tokens.issue_token(identity).unwrap()
    }

    /// Wait until every queued connection eviction has been applied
    pub async fn settle(&self) {
        self.state.broadcaster.flush_evictions().await;
    }
}

/// Configuration used by every E2E test
pub fn test_config() -> config::AppConfig {
    config::AppConfig {
        server: config::ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0, // Let OS assign port
        },
        auth: config::AuthConfig {
            token_secret: Some("test-secret-key-32-bytes-long!!!".to_string()),
            token_ttl_seconds: 3600,
        },
        database: config::DatabaseConfig::default(),
        cache: config::CacheConfig::default(),
        health: config::HealthConfig {
            probe_timeout_ms: 500,
        },
        seed: config::SeedConfig { demo_data: true },
        logging: config::LoggingConfig {
            level: "info".to_string(),
            format: "pretty".to_string(),
        },
    }
}
