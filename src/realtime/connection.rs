//! Live connection handles
//!
//! A handle never writes to the socket itself: it enqueues onto the
//! connection's writer task, so a send never blocks the caller.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::extract::ws::Message;
use thiserror::Error;
use tokio::sync::mpsc;

/// Delivery failure on a single connection
///
/// Contained within the registry/broadcast pair; never surfaced to callers
/// of `broadcast`.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The connection's writer has gone away
    #[error("connection closed")]
    Closed,

    /// The transport rejected the write
    #[error("write failed: {0}")]
    Write(String),
}

/// Sending half of a real-time connection
pub trait LiveConnection: Send + Sync {
    /// Queue a serialized payload for delivery without blocking.
    fn send_text(&self, payload: &str) -> Result<(), ConnectionError>;

    /// Ask the peer to close. Best effort.
    fn close(&self);
}

pub type ConnectionHandle = Arc<dyn LiveConnection>;

/// Distinguishes successive connections registered under one identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// WebSocket connection backed by an unbounded channel to its writer task
pub struct WsConnection {
    tx: mpsc::UnboundedSender<Message>,
}

impl WsConnection {
    /// Create a handle plus the receiver its writer task drains
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl LiveConnection for WsConnection {
    fn send_text(&self, payload: &str) -> Result<(), ConnectionError> {
        self.tx
            .send(Message::Text(payload.to_string()))
            .map_err(|_| ConnectionError::Closed)
    }

    fn close(&self) {
        let _ = self.tx.send(Message::Close(None));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_ids_are_distinct() {
        let a = ConnectionId::next();
        let b = ConnectionId::next();
        assert_ne!(a, b);
        assert!(a.to_string().starts_with("conn-"));
    }

    #[tokio::test]
    async fn ws_connection_fails_once_writer_is_gone() {
        let (connection, mut rx) = WsConnection::new();
        connection.send_text(r#"{"type":"ping"}"#).unwrap();
        assert!(matches!(
            rx.recv().await,
            Some(Message::Text(text)) if text == r#"{"type":"ping"}"#
        ));

        drop(rx);
        assert!(matches!(
            connection.send_text("{}"),
            Err(ConnectionError::Closed)
        ));
    }
}
