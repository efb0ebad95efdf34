//! Connection registry
//!
//! Maps client identity to its open real-time connection. Mutations
//! take the write lock; snapshots and counts take the read lock. No
//! delivery ever happens while the lock is held.

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::connection::{ConnectionHandle, ConnectionId};

struct Registered {
    id: ConnectionId,
    connection: ConnectionHandle,
}

/// Point-in-time copy of one registry entry
#[derive(Clone)]
pub struct ConnectionEntry {
    pub identity: String,
    pub id: ConnectionId,
    pub connection: ConnectionHandle,
}

/// Live connections keyed by identity
#[derive(Default)]
pub struct ConnectionRegistry {
    entries: RwLock<HashMap<String, Registered>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the connection for `identity`
    ///
    /// A superseded connection is asked to close after the lock is released.
    pub async fn register(&self, identity: &str, connection: ConnectionHandle) -> ConnectionId {
        let id = ConnectionId::next();
        let superseded = self
            .entries
            .write()
            .await
            .insert(identity.to_string(), Registered { id, connection });

        if let Some(previous) = superseded {
            tracing::info!(
                identity = %identity,
                connection_id = %previous.id,
                replaced_by = %id,
                "Closing superseded connection"
            );
            previous.connection.close();
        }

        id
    }

    /// Remove whatever connection is registered for `identity`
    pub async fn unregister(&self, identity: &str) -> bool {
        self.entries.write().await.remove(identity).is_some()
    }

    /// Remove the entry only if it still belongs to connection `id`
    ///
    /// Keeps a reconnect under the same identity from being torn down by
    /// the previous connection's cleanup.
    pub async fn unregister_connection(&self, identity: &str, id: ConnectionId) -> bool {
        let mut entries = self.entries.write().await;
        match entries.get(identity) {
            Some(registered) if registered.id == id => {
                entries.remove(identity);
                true
            }
            _ => false,
        }
    }

    /// Copy of every entry, safe to iterate without holding the lock
    pub async fn snapshot(&self) -> Vec<ConnectionEntry> {
        self.entries
            .read()
            .await
            .iter()
            .map(|(identity, registered)| ConnectionEntry {
                identity: identity.clone(),
                id: registered.id,
                connection: registered.connection.clone(),
            })
            .collect()
    }

    /// Number of live entries ("online users")
    pub async fn count(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Identities with a live connection
    pub async fn identities(&self) -> Vec<String> {
        let mut identities: Vec<String> = self.entries.read().await.keys().cloned().collect();
        identities.sort();
        identities
    }
}
