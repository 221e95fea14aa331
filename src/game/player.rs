use super::constants::{
  FIELD_HEIGHT, FIELD_WIDTH, HORIZONTAL_MARGIN, LEFT_SPAWN_ANGLE, MAX_TURN_RATE, MOUTH_OFFSET,
  PLAYER_SPEED, REACH_LENGTH, RIGHT_SPAWN_ANGLE, SPAWN_INSET_X, VERTICAL_MARGIN,
};
use super::math::{clamp, length, normalize, rotate_toward};
use super::types::{Player, Point, Side};

/// One fixed-timestep integration of position and facing. The raw move axis
/// is normalized first so diagonal input is not faster; a zero axis stays
/// zero. Position is clamped into the playfield bounds after integration.
pub fn advance_player(player: &mut Player, dt: f64) {
  let axis = player.input.move_axis;
  if length(axis) > 0.0 {
    let dir = normalize(axis);
    player.pos.x += dir.x * PLAYER_SPEED * dt;
    player.pos.y += dir.y * PLAYER_SPEED * dt;
  }
  player.pos.x = clamp(player.pos.x, HORIZONTAL_MARGIN, FIELD_WIDTH - HORIZONTAL_MARGIN);
  player.pos.y = clamp(player.pos.y, VERTICAL_MARGIN, FIELD_HEIGHT - VERTICAL_MARGIN);

  player.angle = rotate_toward(player.angle, player.input.aim, MAX_TURN_RATE * dt);
}

/// The utensil's effective end: the player position projected by the fixed
/// reach length along the facing angle.
pub fn reach_tip(player: &Player) -> Point {
  Point {
    x: player.pos.x + player.angle.cos() * REACH_LENGTH,
    y: player.pos.y + player.angle.sin() * REACH_LENGTH,
  }
}

/// Mouth anchor point, displaced toward the playfield center by the
/// side-dependent offset.
pub fn mouth_anchor(player: &Player) -> Point {
  Point {
    x: player.pos.x + player.side.inward() * MOUTH_OFFSET,
    y: player.pos.y,
  }
}

/// Canonical match-start pose for a side: inset from the side's wall,
/// vertically centered, facing across the field.
pub fn spawn_pose(side: Side) -> (Point, f64) {
  let angle = match side {
    Side::Left => LEFT_SPAWN_ANGLE,
    Side::Right => RIGHT_SPAWN_ANGLE,
  };
  let x = match side {
    Side::Left => SPAWN_INSET_X,
    Side::Right => FIELD_WIDTH - SPAWN_INSET_X,
  };
  (
    Point {
      x,
      y: FIELD_HEIGHT / 2.0,
    },
    angle,
  )
}
