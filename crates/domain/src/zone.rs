//! Zone: a named grouping of rooms within a home (e.g. "Upstairs").

use serde::{Deserialize, Serialize};

use crate::id::ZoneId;
use crate::room::Room;

/// A named grouping of rooms. Each room carries its accessory list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub name: String,
    pub rooms: Vec<Room>,
    pub handle: ZoneId,
}

impl Zone {
    #[must_use]
    pub fn contains_room(&self, name: &str) -> bool {
        self.rooms.iter().any(|room| room.name == name)
    }
}
