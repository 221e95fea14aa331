pub const FIELD_WIDTH: f64 = 1280.0;
pub const FIELD_HEIGHT: f64 = 720.0;
pub const HORIZONTAL_MARGIN: f64 = 60.0;
pub const VERTICAL_MARGIN: f64 = 80.0;

pub const TICK_MS: u64 = 16;
pub const BROADCAST_MS: u64 = 33;
pub const TICK_DT: f64 = TICK_MS as f64 / 1000.0;

pub const MAX_FULLNESS: i32 = 100;
pub const MOUTH_OPEN_SECS: f64 = 0.4;

pub const PLAYER_SPEED: f64 = 320.0;
pub const MAX_TURN_RATE: f64 = 6.0;

pub const REACH_LENGTH: f64 = 90.0;
pub const PICKUP_RADIUS: f64 = 48.0;
pub const PICKUP_CONE_HALF_ANGLE: f64 = std::f64::consts::PI / 8.0;
pub const POINT_BLANK_RADIUS: f64 = 40.0;

pub const MOUTH_OFFSET: f64 = 34.0;
pub const MOUTH_RADIUS: f64 = 30.0;
pub const EAT_SECS: f64 = 0.35;

pub const GRAVITY: f64 = 420.0;
pub const RELEASE_SPEED: f64 = 260.0;
pub const HOLD_EASE: f64 = 0.35;

pub const SPAWN_INTERVAL_SECS: f64 = 1.6;
pub const MAX_FOODS: usize = 8;
pub const FOOD_SPAWN_Y: f64 = -20.0;
pub const FOOD_DROP_MARGIN: f64 = 60.0;
pub const FOOD_DRIFT_SPEED: f64 = 40.0;

pub const SPAWN_INSET_X: f64 = 180.0;
pub const LEFT_SPAWN_ANGLE: f64 = 0.0;
pub const RIGHT_SPAWN_ANGLE: f64 = std::f64::consts::PI;

pub const FOOD_VALUES: [i32; 4] = [10, 15, 20, 30];

pub const DEFAULT_ROOM_ID: &str = "main";
