use super::constants::{
  EAT_SECS, FIELD_HEIGHT, FIELD_WIDTH, HOLD_EASE, MAX_FOODS, MAX_FULLNESS, MOUTH_OPEN_SECS,
  MOUTH_RADIUS, PICKUP_CONE_HALF_ANGLE, PICKUP_RADIUS, POINT_BLANK_RADIUS, RELEASE_SPEED,
  SPAWN_INTERVAL_SECS,
};
use super::food::{integrate_free_food, spawn_food};
use super::input::{parse_aim, parse_move_axis};
use super::math::{angle_to, distance, wrap_angle};
use super::player::{advance_player, mouth_anchor, reach_tip, spawn_pose};
use super::types::{
  Food, FoodSnapshot, FoodState, Player, PlayerInput, PlayerSnapshot, Point, RoomSnapshot, Side,
};
use crate::protocol::{self, ClientMessage, RoomConfig, ServerMessage};
use rand::Rng;
use std::collections::HashMap;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug)]
pub struct Room {
  id: String,
  state: Mutex<RoomState>,
}

#[derive(Debug)]
struct SessionEntry {
  sender: UnboundedSender<String>,
  player_id: String,
}

#[derive(Debug)]
struct RoomState {
  room_id: String,
  sessions: HashMap<String, SessionEntry>,
  players: HashMap<String, Player>,
  foods: Vec<Food>,
  next_food_id: u32,
  elapsed: f64,
  spawn_accumulator: f64,
  started: bool,
  game_over: bool,
  winner_id: Option<String>,
  loser_id: Option<String>,
}

impl Room {
  pub fn new(id: String) -> Self {
    Self {
      state: Mutex::new(RoomState::new(id.clone())),
      id,
    }
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  /// Accepts a connection into this room, assigning the open side. Returns
  /// the session id, or `None` when both sides are taken; in that case the
  /// rejection notice is already queued on `sender`.
  pub async fn connect(&self, sender: UnboundedSender<String>) -> Option<String> {
    let mut state = self.state.lock().await;
    state.connect_session(sender)
  }

  /// Idempotent leave: unknown session ids are a no-op.
  pub async fn disconnect(&self, session_id: &str) {
    let mut state = self.state.lock().await;
    state.disconnect_session(session_id);
  }

  pub async fn handle_text_message(&self, session_id: &str, text: &str) {
    let Some(message) = protocol::decode_client_message(text) else { return };
    let mut state = self.state.lock().await;
    state.handle_message(session_id, message);
  }

  /// One fixed simulation timestep, driven by the global simulation loop.
  pub async fn advance(&self, dt: f64) {
    let mut state = self.state.lock().await;
    state.tick(dt);
  }

  /// Serializes the current state and fans it out to every session, driven
  /// by the global broadcast loop.
  pub async fn broadcast(&self) {
    let mut state = self.state.lock().await;
    state.broadcast_state();
  }

  /// True when no session remains. Contended rooms report not-idle; the
  /// registry retries on the next disconnect.
  pub fn is_idle(&self) -> bool {
    match self.state.try_lock() {
      Ok(state) => state.sessions.is_empty(),
      Err(_) => false,
    }
  }
}

impl RoomState {
  fn new(room_id: String) -> Self {
    Self {
      room_id,
      sessions: HashMap::new(),
      players: HashMap::new(),
      foods: Vec::new(),
      next_food_id: 0,
      elapsed: 0.0,
      spawn_accumulator: 0.0,
      started: false,
      game_over: false,
      winner_id: None,
      loser_id: None,
    }
  }

  fn connect_session(&mut self, sender: UnboundedSender<String>) -> Option<String> {
    let Some(side) = self.open_side() else {
      if let Some(payload) = protocol::encode_server_message(&ServerMessage::Full) {
        let _ = sender.send(payload);
      }
      return None;
    };

    let session_id = Uuid::new_v4().to_string();
    let player_id = Uuid::new_v4().to_string();
    let player = Self::create_player(player_id.clone(), side);

    let welcome = ServerMessage::Welcome {
      id: player_id.clone(),
      side,
      room_id: self.room_id.clone(),
      config: RoomConfig {
        width: FIELD_WIDTH,
        height: FIELD_HEIGHT,
        max_fullness: MAX_FULLNESS,
      },
    };
    if let Some(payload) = protocol::encode_server_message(&welcome) {
      let _ = sender.send(payload);
    }

    tracing::debug!(room_id = %self.room_id, player_id = %player_id, ?side, "player joined");
    self.sessions.insert(
      session_id.clone(),
      SessionEntry {
        sender,
        player_id: player_id.clone(),
      },
    );
    self.players.insert(player_id, player);
    Some(session_id)
  }

  fn disconnect_session(&mut self, session_id: &str) {
    let Some(entry) = self.sessions.remove(session_id) else { return };
    let Some(player) = self.players.remove(&entry.player_id) else { return };

    // Disconnect mid-hold is an implicit release without impulse.
    if let Some(food_id) = player.holding_food_id {
      if let Some(food) = self.foods.iter_mut().find(|food| food.id == food_id) {
        food.state = FoodState::Free;
        food.held_by = None;
        food.vel = Point { x: 0.0, y: 0.0 };
      }
    }

    tracing::debug!(room_id = %self.room_id, player_id = %entry.player_id, "player left");
    if self.players.len() < 2 {
      self.reset_to_waiting();
    }
  }

  fn handle_message(&mut self, session_id: &str, message: ClientMessage) {
    match message {
      ClientMessage::Input {
        move_axis,
        aim,
        release,
      } => {
        if !self.started || self.game_over {
          return;
        }
        let Some(player_id) = self.session_player_id(session_id) else { return };
        let Some(player) = self.players.get_mut(&player_id) else { return };
        if let Some(axis) = move_axis.and_then(parse_move_axis) {
          player.input.move_axis = axis;
        }
        if let Some(aim) = aim.and_then(parse_aim) {
          player.input.aim = aim;
        }
        if release == Some(true) {
          player.input.release = true;
        }
      }
      ClientMessage::Ready { ready } => {
        if self.started {
          return;
        }
        let Some(player_id) = self.session_player_id(session_id) else { return };
        let Some(player) = self.players.get_mut(&player_id) else { return };
        player.ready = ready.unwrap_or(false);
        self.maybe_start();
      }
    }
  }

  fn session_player_id(&self, session_id: &str) -> Option<String> {
    self
      .sessions
      .get(session_id)
      .map(|entry| entry.player_id.clone())
  }

  fn open_side(&self) -> Option<Side> {
    for side in [Side::Left, Side::Right] {
      if !self.players.values().any(|player| player.side == side) {
        return Some(side);
      }
    }
    None
  }

  fn create_player(id: String, side: Side) -> Player {
    let (pos, angle) = spawn_pose(side);
    Player {
      id,
      side,
      pos,
      angle,
      fullness: 0,
      mouth_open_until: 0.0,
      holding_food_id: None,
      ready: false,
      input: PlayerInput {
        aim: angle,
        ..PlayerInput::default()
      },
    }
  }

  fn maybe_start(&mut self) {
    if self.started || self.players.len() != 2 {
      return;
    }
    if !self.players.values().all(|player| player.ready) {
      return;
    }
    self.start_match();
  }

  fn start_match(&mut self) {
    self.foods.clear();
    self.next_food_id = 0;
    self.elapsed = 0.0;
    self.spawn_accumulator = 0.0;
    self.game_over = false;
    self.winner_id = None;
    self.loser_id = None;
    for player in self.players.values_mut() {
      let (pos, angle) = spawn_pose(player.side);
      player.pos = pos;
      player.angle = angle;
      player.fullness = 0;
      player.mouth_open_until = 0.0;
      player.holding_food_id = None;
      player.input = PlayerInput {
        aim: angle,
        ..PlayerInput::default()
      };
    }
    self.started = true;
    tracing::debug!(room_id = %self.room_id, "match started");
  }

  fn reset_to_waiting(&mut self) {
    self.started = false;
    self.game_over = false;
    self.winner_id = None;
    self.loser_id = None;
    self.elapsed = 0.0;
    self.spawn_accumulator = 0.0;
    self.foods.clear();
    self.next_food_id = 0;
    for player in self.players.values_mut() {
      player.ready = false;
      player.holding_food_id = None;
      player.input = PlayerInput::default();
    }
  }

  fn finish_match(&mut self, loser_id: &str) {
    self.game_over = true;
    self.started = false;
    self.loser_id = Some(loser_id.to_string());
    self.winner_id = self
      .players
      .keys()
      .find(|id| id.as_str() != loser_id)
      .cloned();
    for player in self.players.values_mut() {
      player.ready = false;
    }
    tracing::debug!(room_id = %self.room_id, loser_id, winner_id = ?self.winner_id, "game over");
  }

  fn tick(&mut self, dt: f64) {
    if !self.started || self.game_over {
      return;
    }
    self.elapsed += dt;
    self.heal_hold_references();

    for player in self.players.values_mut() {
      advance_player(player, dt);
    }

    self.apply_pickup_and_release();
    self.track_held_foods();

    let mut rng = rand::thread_rng();
    for food in &mut self.foods {
      integrate_free_food(food, dt, &mut rng);
    }

    self.resolve_eating(dt);
    if self.game_over {
      return;
    }
    self.advance_spawner(dt, &mut rng);
  }

  /// The player -> food edge is authoritative; the food's back-reference is
  /// reconciled here every tick. Orphans on either side are cleared, never
  /// trusted.
  fn heal_hold_references(&mut self) {
    let food_holders: HashMap<u32, Option<String>> = self
      .foods
      .iter()
      .map(|food| (food.id, food.held_by.clone()))
      .collect();
    for player in self.players.values_mut() {
      let Some(food_id) = player.holding_food_id else { continue };
      let points_back = food_holders
        .get(&food_id)
        .map(|holder| holder.as_deref() == Some(player.id.as_str()))
        .unwrap_or(false);
      if !points_back {
        player.holding_food_id = None;
      }
    }
    for food in &mut self.foods {
      if food.state != FoodState::Held {
        continue;
      }
      let valid = food
        .held_by
        .as_ref()
        .and_then(|id| self.players.get(id))
        .map(|player| player.holding_food_id == Some(food.id))
        .unwrap_or(false);
      if !valid {
        food.state = FoodState::Free;
        food.held_by = None;
      }
    }
  }

  /// Release and pickup are exclusive branches within a tick: a player who
  /// throws this tick does not regrab the same food in the same tick. The
  /// release flag is an edge-trigger and is consumed here whether or not it
  /// had an effect.
  fn apply_pickup_and_release(&mut self) {
    for player_id in self.player_ids_in_side_order() {
      let Some(player) = self.players.get_mut(&player_id) else { continue };
      let release = std::mem::take(&mut player.input.release);
      let holding = player.holding_food_id;
      match (holding, release) {
        (Some(food_id), true) => self.release_food(&player_id, food_id),
        (None, _) => self.try_pickup(&player_id),
        _ => {}
      }
    }
  }

  fn release_food(&mut self, player_id: &str, food_id: u32) {
    let angle = match self.players.get(player_id) {
      Some(player) => player.angle,
      None => return,
    };
    if let Some(food) = self.foods.iter_mut().find(|food| food.id == food_id) {
      food.state = FoodState::Free;
      food.held_by = None;
      food.vel = Point {
        x: angle.cos() * RELEASE_SPEED,
        y: angle.sin() * RELEASE_SPEED,
      };
    }
    if let Some(player) = self.players.get_mut(player_id) {
      player.holding_food_id = None;
    }
  }

  /// Scans free foods in insertion order and claims the first one inside
  /// the cone of reach, or close enough to the player to grab regardless of
  /// bearing. At most one pickup per player per tick.
  fn try_pickup(&mut self, player_id: &str) {
    let Some(player) = self.players.get(player_id) else { return };
    let tip = reach_tip(player);
    let pos = player.pos;
    let facing = player.angle;

    let mut picked = None;
    for food in &mut self.foods {
      if food.state != FoodState::Free {
        continue;
      }
      let in_cone = distance(food.pos, tip) <= PICKUP_RADIUS
        && wrap_angle(angle_to(pos, food.pos) - facing).abs() <= PICKUP_CONE_HALF_ANGLE;
      let point_blank = distance(food.pos, pos) <= POINT_BLANK_RADIUS;
      if in_cone || point_blank {
        food.state = FoodState::Held;
        food.held_by = Some(player_id.to_string());
        food.dwell.clear();
        picked = Some(food.id);
        break;
      }
    }

    if let Some(food_id) = picked {
      if let Some(player) = self.players.get_mut(player_id) {
        player.holding_food_id = Some(food_id);
      }
    }
  }

  /// Held food eases toward the holder's reach tip instead of snapping, and
  /// carries no velocity of its own.
  fn track_held_foods(&mut self) {
    let tips: HashMap<String, Point> = self
      .players
      .values()
      .map(|player| (player.id.clone(), reach_tip(player)))
      .collect();
    for food in &mut self.foods {
      if food.state != FoodState::Held {
        continue;
      }
      let Some(tip) = food.held_by.as_ref().and_then(|id| tips.get(id)) else { continue };
      food.pos.x += (tip.x - food.pos.x) * HOLD_EASE;
      food.pos.y += (tip.y - food.pos.y) * HOLD_EASE;
      food.vel = Point { x: 0.0, y: 0.0 };
    }
  }

  /// Single pass over foods in insertion order, players left before right.
  /// Dwell timers accumulate while a food stays inside a mouth region and
  /// reset on any break. The first pair to reach the eat threshold ends the
  /// scan: at most one food is eaten per tick.
  fn resolve_eating(&mut self, dt: f64) {
    let anchors: Vec<(String, Point)> = self
      .player_ids_in_side_order()
      .into_iter()
      .filter_map(|id| {
        self
          .players
          .get(&id)
          .map(|player| (id, mouth_anchor(player)))
      })
      .collect();

    let mut eaten = None;
    'scan: for (index, food) in self.foods.iter_mut().enumerate() {
      for (player_id, mouth) in &anchors {
        let timer = food.dwell.entry(player_id.clone()).or_insert(0.0);
        if distance(food.pos, *mouth) <= MOUTH_RADIUS {
          *timer += dt;
        } else {
          *timer = 0.0;
        }
        if *timer >= EAT_SECS {
          eaten = Some((index, player_id.clone()));
          break 'scan;
        }
      }
    }

    if let Some((index, eater_id)) = eaten {
      self.consume_food(index, &eater_id);
    }
  }

  fn consume_food(&mut self, index: usize, eater_id: &str) {
    let food = self.foods.remove(index);
    if let Some(holder_id) = &food.held_by {
      if let Some(holder) = self.players.get_mut(holder_id) {
        if holder.holding_food_id == Some(food.id) {
          holder.holding_food_id = None;
        }
      }
    }
    let Some(eater) = self.players.get_mut(eater_id) else { return };
    eater.fullness += food.value;
    eater.mouth_open_until = self.elapsed + MOUTH_OPEN_SECS;
    let fullness = eater.fullness;
    tracing::debug!(room_id = %self.room_id, eater_id, value = food.value, fullness, "food eaten");
    if fullness >= MAX_FULLNESS {
      self.finish_match(eater_id);
    }
  }

  fn advance_spawner<R: Rng>(&mut self, dt: f64, rng: &mut R) {
    self.spawn_accumulator += dt;
    if self.spawn_accumulator < SPAWN_INTERVAL_SECS {
      return;
    }
    self.spawn_accumulator = 0.0;
    if self.foods.len() >= MAX_FOODS {
      return;
    }
    let food = spawn_food(self.next_food_id, rng);
    self.next_food_id += 1;
    self.foods.push(food);
  }

  fn player_ids_in_side_order(&self) -> Vec<String> {
    let mut entries: Vec<(Side, String)> = self
      .players
      .values()
      .map(|player| (player.side, player.id.clone()))
      .collect();
    entries.sort_by_key(|(side, _)| match side {
      Side::Left => 0,
      Side::Right => 1,
    });
    entries.into_iter().map(|(_, id)| id).collect()
  }

  fn build_snapshot(&self) -> RoomSnapshot {
    let mut players = Vec::with_capacity(self.players.len());
    for player_id in self.player_ids_in_side_order() {
      let Some(player) = self.players.get(&player_id) else { continue };
      players.push(PlayerSnapshot {
        id: player.id.clone(),
        side: player.side,
        x: player.pos.x,
        y: player.pos.y,
        angle: player.angle,
        fullness: player.fullness,
        mouth_open: self.elapsed < player.mouth_open_until,
        ready: player.ready,
        holding_food_id: player.holding_food_id,
      });
    }
    let foods = self
      .foods
      .iter()
      .map(|food| FoodSnapshot {
        id: food.id,
        x: food.pos.x,
        y: food.pos.y,
        state: food.state,
        held_by: food.held_by.clone(),
        value: food.value,
      })
      .collect();
    RoomSnapshot {
      room_id: self.room_id.clone(),
      started: self.started,
      game_over: self.game_over,
      winner_id: self.winner_id.clone(),
      loser_id: self.loser_id.clone(),
      players,
      foods,
    }
  }

  fn broadcast_state(&mut self) {
    if self.sessions.is_empty() {
      return;
    }
    let snapshot = self.build_snapshot();
    let Some(payload) = protocol::encode_server_message(&ServerMessage::State(snapshot)) else {
      return;
    };
    let mut stale = Vec::new();
    for (session_id, session) in &self.sessions {
      if session.sender.send(payload.clone()).is_err() {
        stale.push(session_id.clone());
      }
    }
    for session_id in stale {
      self.disconnect_session(&session_id);
    }
  }
}
