use crate::game::constants::{BROADCAST_MS, TICK_DT, TICK_MS};
use crate::registry::RoomRegistry;
use std::sync::Arc;
use std::time::Duration;

/// Starts the two global drivers: the fixed-timestep simulation loop and
/// the slower snapshot-broadcast loop. Both iterate every registered room;
/// each room is advanced under its own lock, so a room never blocks another
/// beyond its turn in the iteration.
pub fn spawn_drivers(registry: Arc<RoomRegistry>) {
  tokio::spawn(run_simulation(Arc::clone(&registry)));
  tokio::spawn(run_broadcast(registry));
}

async fn run_simulation(registry: Arc<RoomRegistry>) {
  let mut interval = tokio::time::interval(Duration::from_millis(TICK_MS));
  loop {
    interval.tick().await;
    for room in registry.rooms() {
      room.advance(TICK_DT).await;
    }
  }
}

async fn run_broadcast(registry: Arc<RoomRegistry>) {
  let mut interval = tokio::time::interval(Duration::from_millis(BROADCAST_MS));
  loop {
    interval.tick().await;
    for room in registry.rooms() {
      room.broadcast().await;
    }
  }
}
