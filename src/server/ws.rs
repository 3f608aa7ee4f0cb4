//! WebSocket bridge for real-time updates
//!
//! Forwards the broadcaster's event stream to each connected client. A
//! client that falls behind the channel buffer is lagged out and dropped;
//! it re-synchronizes by re-fetching the full board over HTTP.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;

use super::AppState;

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}

/// Handle a WebSocket connection
async fn handle_websocket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    // Subscribe to broadcast events
    let mut event_rx = state.broadcaster.subscribe();

    log::info!("WebSocket client connected");

    // Forward broadcast events to this client until it disconnects or lags
    // out. A lagged client is dropped rather than allowed to backpressure
    // publishers.
    let send_task = tokio::spawn(async move {
        loop {
            let event = match event_rx.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!("WebSocket client lagged, skipped {} events; dropping", skipped);
                    break;
                }
                Err(RecvError::Closed) => break,
            };

            match serde_json::to_string(&event) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    log::warn!("Failed to serialize event: {}", e);
                }
            }
        }
    });

    // Handle incoming messages
    while let Some(result) = receiver.next().await {
        match result {
            Ok(msg) => match msg {
                Message::Ping(data) => {
                    // Pong is handled automatically by axum
                    log::trace!("Received ping: {:?}", data);
                }
                Message::Pong(_) => {
                    log::trace!("Received pong");
                }
                Message::Text(text) => {
                    // Clients echo their own changes here for same-tab
                    // consistency. The arbiter's publish is authoritative,
                    // so inbound notifications are ignored.
                    log::debug!("Ignoring client-originated event: {}", text);
                }
                Message::Close(_) => {
                    log::info!("WebSocket client disconnected");
                    break;
                }
                _ => {}
            },
            Err(e) => {
                log::warn!("WebSocket error: {}", e);
                break;
            }
        }
    }

    // Clean up
    send_task.abort();
    log::info!("WebSocket connection closed");
}
