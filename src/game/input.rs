use super::math::{clamp, wrap_angle};
use super::types::Point;

/// Clamps a raw move axis into [-1, 1] on each component. Non-finite
/// components reject the whole axis.
pub fn parse_move_axis(value: Point) -> Option<Point> {
  if !value.x.is_finite() || !value.y.is_finite() {
    return None;
  }
  Some(Point {
    x: clamp(value.x, -1.0, 1.0),
    y: clamp(value.y, -1.0, 1.0),
  })
}

pub fn parse_aim(value: f64) -> Option<f64> {
  if !value.is_finite() {
    return None;
  }
  Some(wrap_angle(value))
}
