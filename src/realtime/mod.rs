//! Real-time delivery
//!
//! - `connection`: send-side handle for one live client
//! - `registry`: identity to connection map
//! - `broadcast`: fan-out with deferred eviction of dead connections
//! - `session`: per-socket read/write loop

mod broadcast;
mod connection;
mod registry;
mod session;

pub use broadcast::{BroadcastSummary, Broadcaster};
pub use connection::{ConnectionError, ConnectionHandle, ConnectionId, LiveConnection, WsConnection};
pub use registry::{ConnectionEntry, ConnectionRegistry};
pub use session::run_session;
