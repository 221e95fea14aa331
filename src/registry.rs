use crate::game::room::Room;
use dashmap::DashMap;
use std::sync::Arc;

/// Process-scoped mapping from room id to live room. Rooms are created
/// lazily on first join and removed once their last session leaves, so an
/// identifier can be reused for a fresh room later.
pub struct RoomRegistry {
  rooms: DashMap<String, Arc<Room>>,
}

impl RoomRegistry {
  pub fn new() -> Self {
    Self {
      rooms: DashMap::new(),
    }
  }

  pub fn room(&self, id: &str) -> Arc<Room> {
    match self.rooms.entry(id.to_string()) {
      dashmap::mapref::entry::Entry::Occupied(entry) => entry.get().clone(),
      dashmap::mapref::entry::Entry::Vacant(entry) => {
        tracing::info!(room_id = id, "room created");
        let room = Arc::new(Room::new(id.to_string()));
        entry.insert(room.clone());
        room
      }
    }
  }

  pub fn rooms(&self) -> Vec<Arc<Room>> {
    self
      .rooms
      .iter()
      .map(|entry| entry.value().clone())
      .collect()
  }

  pub fn remove_if_empty(&self, id: &str) {
    let removed = self.rooms.remove_if(id, |_, room| room.is_idle());
    if removed.is_some() {
      tracing::info!(room_id = id, "room destroyed");
    }
  }
}

impl Default for RoomRegistry {
  fn default() -> Self {
    Self::new()
  }
}
