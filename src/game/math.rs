use super::types::Point;
use std::f64::consts::{PI, TAU};

pub fn length(point: Point) -> f64 {
  (point.x * point.x + point.y * point.y).sqrt()
}

pub fn normalize(point: Point) -> Point {
  let len = length(point);
  if !len.is_finite() || len == 0.0 {
    return Point { x: 0.0, y: 0.0 };
  }
  Point {
    x: point.x / len,
    y: point.y / len,
  }
}

pub fn distance(a: Point, b: Point) -> f64 {
  length(Point {
    x: a.x - b.x,
    y: a.y - b.y,
  })
}

pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
  value.min(max).max(min)
}

/// Canonicalizes an angle into (-pi, pi].
pub fn wrap_angle(angle: f64) -> f64 {
  if !angle.is_finite() {
    return 0.0;
  }
  let mut wrapped = angle % TAU;
  if wrapped <= -PI {
    wrapped += TAU;
  } else if wrapped > PI {
    wrapped -= TAU;
  }
  wrapped
}

/// Moves `current` toward `target` by at most `max_step` radians along the
/// shortest wrapped arc. Never overshoots; the result is canonical.
pub fn rotate_toward(current: f64, target: f64, max_step: f64) -> f64 {
  let delta = wrap_angle(target - current);
  if delta.abs() <= max_step {
    return wrap_angle(target);
  }
  let step = if delta > 0.0 { max_step } else { -max_step };
  wrap_angle(current + step)
}

/// Bearing of `to` as seen from `from`, in (-pi, pi].
pub fn angle_to(from: Point, to: Point) -> f64 {
  wrap_angle((to.y - from.y).atan2(to.x - from.x))
}
