//! Accessory: a controllable smart device.

use serde::{Deserialize, Serialize};

use crate::id::AccessoryId;
use crate::room::Room;
use crate::service::Service;

/// A controllable device, optionally bridged and optionally assigned to a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Accessory {
    pub name: String,
    /// Reachable through an intermediary hub rather than directly.
    pub bridged: bool,
    /// Back-reference to the assigned room. Its accessory list is always omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<Room>,
    pub services: Vec<Service>,
    pub handle: AccessoryId,
}

impl Accessory {
    /// Name of the room this accessory is assigned to, if any.
    #[must_use]
    pub fn room_name(&self) -> Option<&str> {
        self.room.as_ref().map(|room| room.name.as_str())
    }

    /// First service with the given name.
    #[must_use]
    pub fn service(&self, name: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.name == name)
    }
}
