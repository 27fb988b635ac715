//! `WebSocket` handler for realtime dispatch events.
//!
//! Clients connect to `GET /ws` and receive one JSON text frame
//! `{"event": <name>, "data": <payload>}` per stored change. All
//! clients share one [`broadcast`] channel, so events are delivered in
//! emission order and a client that connects late sees nothing older.
//!
//! If a client falls behind, lagged events are skipped and the client
//! resumes from the most recent one.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use tokio::sync::broadcast;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming dispatch events.
///
/// # Route
///
/// `GET /ws`
pub async fn ws_events(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Run one connection from `Connected` to `Disconnected`.
async fn handle_ws(socket: WebSocket, state: Arc<AppState>) {
    let connection = Uuid::new_v4().to_string();
    let broadcaster = state.dispatcher.broadcaster();

    let rx = state.dispatcher.subscribe();
    broadcaster.connected(&connection);
    forward_events(socket, rx, &connection).await;
    broadcaster.disconnected(&connection);
}

/// Forward broadcast events to the socket until either side goes away.
async fn forward_events(
    mut socket: WebSocket,
    mut rx: broadcast::Receiver<siren_types::RealtimeEvent>,
    connection: &str,
) {
    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(event) => {
                        let json = match serde_json::to_string(&event) {
                            Ok(j) => j,
                            Err(e) => {
                                warn!(connection, "Failed to serialize realtime event: {e}");
                                continue;
                            }
                        };
                        if socket.send(Message::Text(json.into())).await.is_err() {
                            debug!(connection, "WebSocket send failed");
                            return;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(connection, skipped = n, "WebSocket client lagged, skipping ahead");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!(connection, "Broadcast channel closed, shutting down WebSocket");
                        return;
                    }
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => return,
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!(connection, "WebSocket pong failed");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        debug!(connection, "WebSocket error: {e}");
                        return;
                    }
                    // Clients only listen.
                    _ => {}
                }
            }
        }
    }
}
