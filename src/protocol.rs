use crate::game::types::{Point, RoomSnapshot, Side};
use serde::{Deserialize, Serialize};

/// Closed set of inbound message kinds. Unknown tags and malformed payloads
/// decode to `None` and are dropped at the boundary without a reply.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
  #[serde(rename = "input")]
  Input {
    #[serde(rename = "move")]
    move_axis: Option<Point>,
    aim: Option<f64>,
    release: Option<bool>,
  },
  #[serde(rename = "ready")]
  Ready { ready: Option<bool> },
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct RoomConfig {
  pub width: f64,
  pub height: f64,
  #[serde(rename = "maxFullness")]
  pub max_fullness: i32,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
  #[serde(rename = "welcome")]
  Welcome {
    id: String,
    side: Side,
    #[serde(rename = "roomId")]
    room_id: String,
    config: RoomConfig,
  },
  #[serde(rename = "full")]
  Full,
  #[serde(rename = "state")]
  State(RoomSnapshot),
}

pub fn decode_client_message(text: &str) -> Option<ClientMessage> {
  serde_json::from_str(text).ok()
}

pub fn encode_server_message(message: &ServerMessage) -> Option<String> {
  serde_json::to_string(message).ok()
}
