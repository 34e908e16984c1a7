use anyhow::Result;
use axum::Router;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use dashmap::DashMap;
use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use uuid::Uuid;

type Peer = (Uuid, mpsc::UnboundedSender<Message>);

/// In-process signaling relay with room semantics: `join` is acknowledged to
/// the sender, `offer`/`answer`/`ice-candidate` go to everyone else in the
/// room, anything else earns an `error` reply. Messages whose `code` does not
/// name the room are ignored.
#[derive(Clone, Default)]
pub struct RelayStub {
    rooms: Arc<DashMap<String, Vec<Peer>>>,
    received: Arc<Mutex<Vec<Value>>>,
}

/// Starts the relay on an ephemeral port. Returns its `ws://` base URL.
pub async fn spawn_relay() -> Result<(String, RelayStub)> {
    let relay = RelayStub::default();
    let app = Router::new()
        .route("/ws/signal/{room}/", get(ws_handler))
        .with_state(relay.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok((format!("ws://{}", addr), relay))
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(room): Path<String>,
    State(relay): State<RelayStub>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, room, relay))
}

async fn handle_socket(socket: WebSocket, room: String, relay: RelayStub) {
    let id = Uuid::new_v4();
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    relay
        .rooms
        .entry(room.clone())
        .or_default()
        .push((id, tx.clone()));

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let relay = relay.clone();
        let room = room.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match serde_json::from_str::<Value>(text.as_str()) {
                        Ok(data) => relay.on_text(&room, id, &tx, data),
                        Err(e) => tracing::warn!("[RelayStub] invalid JSON: {}", e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    if let Some(mut peers) = relay.rooms.get_mut(&room) {
        peers.retain(|(peer, _)| *peer != id);
    }
}

impl RelayStub {
    fn on_text(&self, room: &str, id: Uuid, tx: &mpsc::UnboundedSender<Message>, data: Value) {
        self.received.lock().unwrap().push(data.clone());

        if data.get("code").and_then(Value::as_str) != Some(room) {
            return;
        }
        let role = data.get("role").cloned().unwrap_or(Value::Null);

        match data.get("type").and_then(Value::as_str) {
            Some("join") => {
                let ack = json!({
                    "type": "join_ack",
                    "message": "Join acknowledged",
                    "role": role,
                    "code": room,
                });
                let _ = tx.send(Message::Text(ack.to_string().into()));
            }
            Some(kind @ ("offer" | "answer" | "ice-candidate")) => {
                let forwarded = json!({
                    "type": kind,
                    "data": data.get("data").cloned().unwrap_or(Value::Null),
                    "role": role,
                    "code": room,
                });
                let text = forwarded.to_string();
                if let Some(peers) = self.rooms.get(room) {
                    for (peer, peer_tx) in peers.iter() {
                        if *peer != id {
                            let _ = peer_tx.send(Message::Text(text.clone().into()));
                        }
                    }
                }
            }
            other => {
                let error = json!({
                    "type": "error",
                    "message": format!("Unknown message type: {}", other.unwrap_or("None")),
                    "code": room,
                });
                let _ = tx.send(Message::Text(error.to_string().into()));
            }
        }
    }

    pub fn peers(&self, room: &str) -> usize {
        self.rooms.get(room).map(|p| p.len()).unwrap_or(0)
    }

    /// Raw JSON of every frame the relay received.
    pub fn received(&self) -> Vec<Value> {
        self.received.lock().unwrap().clone()
    }

    pub async fn wait_for_peers(&self, room: &str, count: usize, timeout_ms: u64) -> bool {
        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(timeout_ms);

        loop {
            if self.peers(room) >= count {
                return true;
            }
            if start.elapsed() > timeout {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}
