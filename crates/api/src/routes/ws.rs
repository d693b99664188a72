//! WebSocket feed of order changes.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use domain::ArchiveSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::{self, error::RecvError};

use super::orders::AppState;
use crate::notify::OrderNotification;

/// GET /order/ws: upgrade to a WebSocket that streams every order change.
pub async fn subscribe<A: ArchiveSink + 'static>(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState<A>>>,
) -> impl IntoResponse {
    let notifications = state.notifier.subscribe();
    ws.on_upgrade(move |socket| handle_socket(socket, notifications))
}

async fn handle_socket(socket: WebSocket, mut notifications: broadcast::Receiver<OrderNotification>) {
    let (mut ws_write, mut ws_read) = socket.split();
    metrics::gauge!("websocket_subscribers").increment(1.0);

    let write_handle = tokio::spawn(async move {
        loop {
            let notification = match notifications.recv().await {
                Ok(notification) => notification,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "subscriber lagging, notifications dropped");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            match serde_json::to_string(&notification) {
                Ok(json) => {
                    if ws_write.send(Message::Text(json.into())).await.is_err() {
                        tracing::debug!("WebSocket write failed, closing");
                        break;
                    }
                }
                Err(e) => tracing::error!(error = %e, "failed to serialize notification"),
            }
        }
    });

    // The feed is one-way; client frames are only watched for a close.
    while let Some(result) = ws_read.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(error = %e, "WebSocket read error");
                break;
            }
        }
    }

    write_handle.abort();
    metrics::gauge!("websocket_subscribers").decrement(1.0);
}
