//! Live update WebSocket handler
//!
//! Subscribes the connection to the broadcaster and forwards every update as
//! a JSON text frame. Authentication happens before the upgrade via the
//! `?token=` query parameter (browsers cannot set headers on WebSockets).

use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::Extension,
    response::IntoResponse,
};
use campus_core::Broadcaster;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::middleware::auth::CurrentUser;

/// Interval between keepalive pings
const PING_INTERVAL_SECS: u64 = 30;

/// WebSocket upgrade handler
pub async fn live_handler(
    CurrentUser(user): CurrentUser,
    Extension(bus): Extension<Broadcaster>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let user_id = user.id;
    ws.on_upgrade(move |socket| handle_socket(socket, bus, user_id))
}

async fn handle_socket(socket: WebSocket, bus: Broadcaster, user_id: uuid::Uuid) {
    info!(%user_id, "live update connection established");

    let (mut sender, mut receiver) = socket.split();
    let mut updates = bus.subscribe();
    let mut ping = tokio::time::interval(tokio::time::Duration::from_secs(PING_INTERVAL_SECS));
    ping.tick().await; // first tick fires immediately

    loop {
        tokio::select! {
            update = updates.recv() => {
                match update {
                    Ok(update) => {
                        let json = match serde_json::to_string(&update) {
                            Ok(json) => json,
                            Err(e) => {
                                warn!("failed to serialize live update: {}", e);
                                continue;
                            }
                        };
                        if sender.send(Message::Text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(missed)) => {
                        // Client fell behind; it will catch up on its next fetch
                        debug!(%user_id, missed, "live update subscriber lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    // Inbound frames are ignored; this stream is one-way
                    Some(Ok(_)) => {}
                }
            }
            _ = ping.tick() => {
                if sender.send(Message::Ping(Vec::new())).await.is_err() {
                    break;
                }
            }
        }
    }

    info!(%user_id, "live update connection closed");
}
