//! Broadcast fan-out
//!
//! Delivers one payload to every registered connection. A failed write
//! never stalls the remaining peers: the offending connection is queued
//! for eviction and a single remover task applies evictions against the
//! registry's write lock, outside the broadcast call.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};

use super::connection::ConnectionId;
use super::registry::ConnectionRegistry;

enum CleanupCommand {
    Evict {
        identity: String,
        id: ConnectionId,
    },
    /// Acknowledged once every earlier command has been applied
    Barrier(oneshot::Sender<()>),
}

/// Outcome of one broadcast, informational only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BroadcastSummary {
    pub delivered: usize,
    pub failed: usize,
}

/// Fan-out handle; cheap to clone
#[derive(Clone)]
pub struct Broadcaster {
    registry: Arc<ConnectionRegistry>,
    cleanup_tx: mpsc::UnboundedSender<CleanupCommand>,
}

impl Broadcaster {
    /// Create a broadcaster and spawn its eviction worker
    ///
    /// Must be called from within a Tokio runtime. The worker exits when
    /// the last clone of the broadcaster is dropped.
    pub fn spawn(registry: Arc<ConnectionRegistry>) -> Self {
        let (cleanup_tx, cleanup_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_eviction_worker(registry.clone(), cleanup_rx));
        Self {
            registry,
            cleanup_tx,
        }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Deliver `message` to every registered connection
    ///
    /// Fire-and-forget: failures are logged and resolved by eviction,
    /// never reported as an error.
    pub async fn broadcast<T>(&self, message: &T) -> BroadcastSummary
    where
        T: Serialize + ?Sized,
    {
        let payload = match serde_json::to_string(message) {
            Ok(payload) => payload,
            Err(error) => {
                tracing::warn!(%error, "Dropping broadcast payload that failed to serialize");
                return BroadcastSummary::default();
            }
        };

        // The snapshot releases the read lock before any delivery.
        let entries = self.registry.snapshot().await;
        let mut summary = BroadcastSummary::default();

        for entry in entries {
            match entry.connection.send_text(&payload) {
                Ok(()) => summary.delivered += 1,
                Err(error) => {
                    tracing::warn!(
                        identity = %entry.identity,
                        connection_id = %entry.id,
                        %error,
                        "Broadcast delivery failed; scheduling eviction"
                    );
                    summary.failed += 1;
                    self.schedule_eviction(entry.identity, entry.id);
                }
            }
        }

        tracing::debug!(
            delivered = summary.delivered,
            failed = summary.failed,
            "Broadcast complete"
        );
        summary
    }

    /// Queue removal of a connection that failed delivery
    pub fn schedule_eviction(&self, identity: String, id: ConnectionId) {
        if self
            .cleanup_tx
            .send(CleanupCommand::Evict { identity, id })
            .is_err()
        {
            tracing::warn!(connection_id = %id, "Eviction worker is gone; eviction dropped");
        }
    }

    /// Wait until every eviction queued so far has been applied
    pub async fn flush_evictions(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.cleanup_tx.send(CleanupCommand::Barrier(ack_tx)).is_ok() {
            let _ = ack_rx.await;
        }
    }
}

async fn run_eviction_worker(
    registry: Arc<ConnectionRegistry>,
    mut commands: mpsc::UnboundedReceiver<CleanupCommand>,
) {
    while let Some(command) = commands.recv().await {
        match command {
            CleanupCommand::Evict { identity, id } => {
                if registry.unregister_connection(&identity, id).await {
                    tracing::info!(
                        identity = %identity,
                        connection_id = %id,
                        "Evicted dead connection"
                    );
                }
            }
            CleanupCommand::Barrier(ack) => {
                let _ = ack.send(());
            }
        }
    }

    tracing::debug!("Eviction worker stopped");
}
