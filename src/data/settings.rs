//! Runtime configuration store

use tokio::sync::RwLock;

use super::models::{RuntimeConfig, RuntimeConfigPatch};

/// Singleton runtime configuration behind a reader/writer lock
#[derive(Default)]
pub struct SettingsStore {
    current: RwLock<RuntimeConfig>,
}

impl SettingsStore {
    pub fn new(initial: RuntimeConfig) -> Self {
        Self {
            current: RwLock::new(initial),
        }
    }

    pub async fn get(&self) -> RuntimeConfig {
        self.current.read().await.clone()
    }

    pub async fn feature_enabled(&self, name: &str) -> bool {
        self.current.read().await.feature_enabled(name)
    }

    /// Merge a partial update and return the resulting configuration
    pub async fn apply(&self, patch: RuntimeConfigPatch) -> RuntimeConfig {
        let mut current = self.current.write().await;

        if !patch.app_name.trim().is_empty() {
            current.app_name = patch.app_name;
        }
        if !patch.version.trim().is_empty() {
            current.version = patch.version;
        }
        if patch.max_users > 0 {
            current.max_users = patch.max_users;
        }
        if patch.rate_limit > 0 {
            current.rate_limit = patch.rate_limit;
        }
        if let Some(maintenance_mode) = patch.maintenance_mode {
            current.maintenance_mode = maintenance_mode;
        }
        if let Some(features) = patch.features {
            current.features.extend(features);
        }

        current.clone()
    }
}
