use super::constants::{
  FIELD_HEIGHT, FIELD_WIDTH, FOOD_DRIFT_SPEED, FOOD_DROP_MARGIN, FOOD_SPAWN_Y, FOOD_VALUES,
  GRAVITY, HORIZONTAL_MARGIN,
};
use super::types::{Food, FoodState, Point};
use rand::Rng;
use std::collections::HashMap;

pub fn spawn_food<R: Rng>(id: u32, rng: &mut R) -> Food {
  Food {
    id,
    pos: Point {
      x: random_drop_x(rng),
      y: FOOD_SPAWN_Y,
    },
    vel: Point {
      x: random_drift(rng),
      y: 0.0,
    },
    value: FOOD_VALUES[rng.gen_range(0..FOOD_VALUES.len())],
    state: FoodState::Free,
    held_by: None,
    dwell: HashMap::new(),
  }
}

/// Gravity integration for a free food. A food falling past the bottom
/// margin is recycled in place, never removed: the live pool has a fixed
/// population between spawner ticks.
pub fn integrate_free_food<R: Rng>(food: &mut Food, dt: f64, rng: &mut R) {
  if food.state != FoodState::Free {
    return;
  }
  food.vel.y += GRAVITY * dt;
  food.pos.x += food.vel.x * dt;
  food.pos.y += food.vel.y * dt;

  if food.pos.y > FIELD_HEIGHT + FOOD_DROP_MARGIN {
    recycle_food(food, rng);
  }
}

pub fn recycle_food<R: Rng>(food: &mut Food, rng: &mut R) {
  food.pos = Point {
    x: random_drop_x(rng),
    y: FOOD_SPAWN_Y,
  };
  food.vel = Point {
    x: random_drift(rng),
    y: 0.0,
  };
  food.dwell.clear();
}

fn random_drop_x<R: Rng>(rng: &mut R) -> f64 {
  rng.gen_range(HORIZONTAL_MARGIN..FIELD_WIDTH - HORIZONTAL_MARGIN)
}

fn random_drift<R: Rng>(rng: &mut R) -> f64 {
  rng.gen_range(-FOOD_DRIFT_SPEED..FOOD_DRIFT_SPEED)
}
