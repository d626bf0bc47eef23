//! Home: the top-level container of rooms, zones and accessories.

use serde::{Deserialize, Serialize};

use crate::accessory::Accessory;
use crate::id::HomeId;
use crate::room::Room;
use crate::zone::Zone;

/// Snapshot of a home and everything it contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Home {
    pub name: String,
    /// At most one home is primary.
    pub primary: bool,
    pub rooms: Vec<Room>,
    pub accessories: Vec<Accessory>,
    pub zones: Vec<Zone>,
    pub handle: HomeId,
}

impl Home {
    /// First room with the given name.
    #[must_use]
    pub fn room(&self, name: &str) -> Option<&Room> {
        self.rooms.iter().find(|room| room.name == name)
    }

    /// First zone with the given name.
    #[must_use]
    pub fn zone(&self, name: &str) -> Option<&Zone> {
        self.zones.iter().find(|zone| zone.name == name)
    }

    /// First accessory with the given name.
    #[must_use]
    pub fn accessory(&self, name: &str) -> Option<&Accessory> {
        self.accessories.iter().find(|acc| acc.name == name)
    }
}
