use axum::{
  extract::ws::{Message, WebSocket},
  extract::{Query, State, WebSocketUpgrade},
  http::Method,
  response::IntoResponse,
  routing::get,
  Json, Router,
};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use std::collections::HashMap;
use std::env;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

mod game;
mod protocol;
mod registry;
mod runtime;

use game::constants::DEFAULT_ROOM_ID;
use game::room::Room;
use registry::RoomRegistry;

#[derive(Clone)]
struct AppState {
  registry: Arc<RoomRegistry>,
}

#[derive(Debug, Serialize)]
struct OkResponse {
  ok: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let registry = Arc::new(RoomRegistry::new());
  runtime::spawn_drivers(Arc::clone(&registry));

  let state = Arc::new(AppState { registry });

  let cors = CorsLayer::new()
    .allow_origin(Any)
    .allow_methods([Method::GET])
    .allow_headers(Any);

  let app: Router = Router::new()
    .route("/api/health", get(health))
    .route("/ws", get(ws_handler))
    .layer(cors)
    .with_state(state);

  let port: u16 = env::var("PORT")
    .ok()
    .and_then(|value| value.parse().ok())
    .unwrap_or(8787);

  let address = format!("0.0.0.0:{port}");
  tracing::info!("listening on {address}");

  let listener = tokio::net::TcpListener::bind(&address).await?;
  axum::serve(listener, app).await?;

  Ok(())
}

async fn health() -> impl IntoResponse {
  Json(OkResponse { ok: true })
}

async fn ws_handler(
  ws: WebSocketUpgrade,
  Query(params): Query<HashMap<String, String>>,
  State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
  let room_id = params
    .get("room")
    .map(|value| value.trim())
    .filter(|value| !value.is_empty())
    .unwrap_or(DEFAULT_ROOM_ID)
    .to_string();
  let room = state.registry.room(&room_id);
  let registry = Arc::clone(&state.registry);
  ws.on_upgrade(move |socket| handle_socket(socket, room, registry))
}

async fn handle_socket(socket: WebSocket, room: Arc<Room>, registry: Arc<RoomRegistry>) {
  let (mut sender, mut receiver) = socket.split();
  let (tx, mut rx) = mpsc::unbounded_channel::<String>();

  let send_task = tokio::spawn(async move {
    while let Some(payload) = rx.recv().await {
      if sender.send(Message::Text(payload)).await.is_err() {
        break;
      }
    }
  });

  let Some(session_id) = room.connect(tx).await else {
    // Room full: the rejection notice is queued; let the pump flush it,
    // then drop the socket.
    let _ = send_task.await;
    registry.remove_if_empty(room.id());
    return;
  };

  while let Some(result) = receiver.next().await {
    let Ok(message) = result else { break };
    match message {
      Message::Text(text) => {
        room.handle_text_message(&session_id, &text).await;
      }
      Message::Close(_) => break,
      _ => {}
    }
  }

  room.disconnect(&session_id).await;
  registry.remove_if_empty(room.id());
  send_task.abort();
}
