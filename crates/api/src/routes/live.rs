//! WebSocket endpoint for live registration counts.
//!
//! Clients connect to `/ws` and send join/leave messages naming the events
//! they want to watch. Every registration or cancellation on a joined event
//! produces a `registration-update` frame with the fresh count.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

use crate::app::AppState;
use domain::models::registration::RegistrationUpdate;

/// Outbound frame buffer per connection.
const SEND_BUFFER: usize = 32;

/// Messages a client may send over the socket.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
enum ClientMessage {
    #[serde(rename_all = "camelCase")]
    Join { event_id: Uuid },
    #[serde(rename_all = "camelCase")]
    Leave { event_id: Uuid },
}

/// Frame pushed to clients watching an event.
#[derive(Debug, Serialize)]
struct UpdateFrame {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(flatten)]
    update: RegistrationUpdate,
}

impl UpdateFrame {
    fn new(update: RegistrationUpdate) -> Self {
        Self {
            kind: "registration-update",
            update,
        }
    }
}

/// WebSocket upgrade handler.
///
/// GET /ws
pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::channel::<String>(SEND_BUFFER);
    let mut joined: HashMap<Uuid, JoinHandle<()>> = HashMap::new();

    loop {
        tokio::select! {
            Some(frame) = rx.recv() => {
                if sink.send(Message::Text(frame)).await.is_err() {
                    break;
                }
            }
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(ClientMessage::Join { event_id }) => {
                                if !joined.contains_key(&event_id) {
                                    let task = spawn_forwarder(&state, event_id, tx.clone()).await;
                                    joined.insert(event_id, task);
                                    debug!(event_id = %event_id, "WebSocket client joined event");
                                }
                            }
                            Ok(ClientMessage::Leave { event_id }) => {
                                if let Some(task) = joined.remove(&event_id) {
                                    task.abort();
                                    debug!(event_id = %event_id, "WebSocket client left event");
                                }
                            }
                            Err(e) => {
                                debug!(error = %e, "Ignoring malformed WebSocket message");
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    for task in joined.into_values() {
        task.abort();
    }
}

/// Forwards one event's broadcast updates into the connection's send queue.
async fn spawn_forwarder(
    state: &AppState,
    event_id: Uuid,
    tx: mpsc::Sender<String>,
) -> JoinHandle<()> {
    let mut updates = state.live.subscribe(event_id).await;

    tokio::spawn(async move {
        loop {
            match updates.recv().await {
                Ok(update) => {
                    let frame = match serde_json::to_string(&UpdateFrame::new(update)) {
                        Ok(frame) => frame,
                        Err(_) => continue,
                    };
                    if tx.send(frame).await.is_err() {
                        break;
                    }
                }
                // A lagging watcher misses intermediate updates and resumes
                // with the next one.
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    })
}
