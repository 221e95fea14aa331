use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Point {
  pub x: f64,
  pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
  Left,
  Right,
}

impl Side {
  /// Unit x-direction from the player toward the playfield center.
  pub fn inward(self) -> f64 {
    match self {
      Side::Left => 1.0,
      Side::Right => -1.0,
    }
  }
}

#[derive(Debug, Clone, Copy)]
pub struct PlayerInput {
  pub move_axis: Point,
  pub aim: f64,
  pub release: bool,
}

impl Default for PlayerInput {
  fn default() -> Self {
    Self {
      move_axis: Point { x: 0.0, y: 0.0 },
      aim: 0.0,
      release: false,
    }
  }
}

#[derive(Debug, Clone)]
pub struct Player {
  pub id: String,
  pub side: Side,
  pub pos: Point,
  pub angle: f64,
  pub fullness: i32,
  pub mouth_open_until: f64,
  pub holding_food_id: Option<u32>,
  pub ready: bool,
  pub input: PlayerInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodState {
  Free,
  Held,
}

#[derive(Debug, Clone)]
pub struct Food {
  pub id: u32,
  pub pos: Point,
  pub vel: Point,
  pub value: i32,
  pub state: FoodState,
  pub held_by: Option<String>,
  pub dwell: HashMap<String, f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerSnapshot {
  pub id: String,
  pub side: Side,
  pub x: f64,
  pub y: f64,
  pub angle: f64,
  pub fullness: i32,
  #[serde(rename = "mouthOpen")]
  pub mouth_open: bool,
  pub ready: bool,
  #[serde(rename = "holdingFoodId")]
  pub holding_food_id: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FoodSnapshot {
  pub id: u32,
  pub x: f64,
  pub y: f64,
  pub state: FoodState,
  #[serde(rename = "heldBy")]
  pub held_by: Option<String>,
  pub value: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomSnapshot {
  #[serde(rename = "roomId")]
  pub room_id: String,
  pub started: bool,
  #[serde(rename = "gameOver")]
  pub game_over: bool,
  #[serde(rename = "winnerId")]
  pub winner_id: Option<String>,
  #[serde(rename = "loserId")]
  pub loser_id: Option<String>,
  pub players: Vec<PlayerSnapshot>,
  pub foods: Vec<FoodSnapshot>,
}
