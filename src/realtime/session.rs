//! WebSocket session loop
//!
//! One task per upgraded socket. Outbound frames go through a dedicated
//! writer task; the reader loop rebroadcasts every well-formed JSON frame
//! and ends the session on close, read error or malformed JSON.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};

use super::broadcast::Broadcaster;
use super::connection::WsConnection;

/// Drive an upgraded socket until the peer goes away
pub async fn run_session(socket: WebSocket, broadcaster: Broadcaster, identity: String) {
    let (mut sink, mut stream) = socket.split();
    let (connection, mut outbound) = WsConnection::new();
    let connection_id = broadcaster
        .registry()
        .register(&identity, Arc::new(connection))
        .await;

    tracing::info!(
        identity = %identity,
        connection_id = %connection_id,
        "WebSocket client connected"
    );

    let writer = tokio::spawn(async move {
        while let Some(message) = outbound.recv().await {
            let closing = matches!(message, Message::Close(_));
            if sink.send(message).await.is_err() || closing {
                break;
            }
        }
        let _ = sink.close().await;
    });

    while let Some(frame) = stream.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Binary(bytes)) => match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(_) => {
                    tracing::debug!(identity = %identity, "Non UTF-8 binary frame; ending session");
                    break;
                }
            },
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => continue,
            Ok(Message::Close(_)) => break,
            Err(error) => {
                tracing::debug!(identity = %identity, %error, "WebSocket read failed");
                break;
            }
        };

        match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(payload) => {
                broadcaster.broadcast(&payload).await;
            }
            Err(error) => {
                tracing::debug!(identity = %identity, %error, "Malformed frame; ending session");
                break;
            }
        }
    }

    writer.abort();
    broadcaster
        .registry()
        .unregister_connection(&identity, connection_id)
        .await;

    tracing::info!(
        identity = %identity,
        connection_id = %connection_id,
        "WebSocket client disconnected"
    );
}
