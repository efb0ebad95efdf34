//! External dependency probes
//!
//! Optional PostgreSQL and Redis backends. Neither is required to serve
//! traffic; both are pinged for health and status reporting only.

mod cache;
mod database;

use std::time::Duration;

use serde::Serialize;

use crate::config::AppConfig;
use crate::error::AppError;

pub use cache::CacheProbe;
pub use database::DatabaseProbe;

/// Result of one dependency ping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    Up,
    Down,
    NotConfigured,
}

/// Status of every optional dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DependencyStatus {
    pub database: ProbeStatus,
    pub redis: ProbeStatus,
}

/// Holds whichever dependency clients are configured
#[derive(Clone, Default)]
pub struct DependencyProbes {
    database: Option<DatabaseProbe>,
    cache: Option<CacheProbe>,
}

impl DependencyProbes {
    /// Build clients from configuration without contacting either service
    pub fn connect(config: &AppConfig) -> Result<Self, AppError> {
        let database = config
            .database
            .url
            .as_deref()
            .map(DatabaseProbe::connect_lazy)
            .transpose()?;
        let cache = config
            .cache
            .url
            .as_deref()
            .map(CacheProbe::open)
            .transpose()?;

        tracing::info!(
            database = database.is_some(),
            cache = cache.is_some(),
            "Dependency probes configured"
        );

        Ok(Self { database, cache })
    }

    /// Ping every configured dependency concurrently
    ///
    /// Each ping is bounded by `timeout`; a slow or failing dependency is
    /// reported as `Down`, never as an error.
    pub async fn check(&self, timeout: Duration) -> DependencyStatus {
        let database = async {
            match &self.database {
                Some(probe) => bounded("database", timeout, probe.ping()).await,
                None => ProbeStatus::NotConfigured,
            }
        };
        let redis = async {
            match &self.cache {
                Some(probe) => bounded("redis", timeout, probe.ping()).await,
                None => ProbeStatus::NotConfigured,
            }
        };

        let (database, redis) = tokio::join!(database, redis);
        DependencyStatus { database, redis }
    }
}

async fn bounded<F>(name: &'static str, timeout: Duration, ping: F) -> ProbeStatus
where
    F: std::future::Future<Output = anyhow::Result<()>>,
{
    match tokio::time::timeout(timeout, ping).await {
        Ok(Ok(())) => ProbeStatus::Up,
        Ok(Err(error)) => {
            tracing::warn!(dependency = name, %error, "Dependency ping failed");
            ProbeStatus::Down
        }
        Err(_) => {
            tracing::warn!(dependency = name, ?timeout, "Dependency ping timed out");
            ProbeStatus::Down
        }
    }
}
