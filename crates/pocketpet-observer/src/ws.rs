//! `WebSocket` handler for real-time pet snapshots.
//!
//! Clients connect to `GET /ws/pet`, immediately receive the current
//! snapshot, then a JSON-encoded [`PetSnapshot`] every time the session
//! publishes one. The session publishes on a `watch` channel, so a slow
//! client skips intermediate snapshots and always sees the newest.
//!
//! [`PetSnapshot`]: pocketpet_types::PetSnapshot

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use pocketpet_types::PetSnapshot;
use tracing::{debug, warn};

use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming snapshots.
///
/// # Route
///
/// `GET /ws/pet`
pub async fn ws_pet(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Handle the `WebSocket` lifecycle: forward every published snapshot as
/// a text frame until either side goes away.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    debug!("WebSocket client connected");

    let mut rx = state.session.subscribe();
    let first = rx.borrow_and_update().clone();
    if !send_snapshot(&mut socket, &first).await {
        return;
    }

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    debug!("Session stopped, closing WebSocket");
                    return;
                }
                let snapshot = rx.borrow_and_update().clone();
                if !send_snapshot(&mut socket, &snapshot).await {
                    return;
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("WebSocket client disconnected");
                        return;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!("WebSocket client disconnected (pong failed)");
                            return;
                        }
                    }
                    Some(Err(e)) => {
                        debug!(error = %e, "WebSocket receive error");
                        return;
                    }
                    // Text/binary from the client are ignored.
                    Some(Ok(_)) => {}
                }
            }
        }
    }
}

/// Send one snapshot. Returns `false` once the client is gone.
async fn send_snapshot(socket: &mut WebSocket, snapshot: &PetSnapshot) -> bool {
    let json = match serde_json::to_string(snapshot) {
        Ok(j) => j,
        Err(e) => {
            warn!("Failed to serialize pet snapshot: {e}");
            return true;
        }
    };
    if socket.send(Message::Text(json.into())).await.is_err() {
        debug!("WebSocket client disconnected (send failed)");
        return false;
    }
    true
}
