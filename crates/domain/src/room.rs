//! Room: a named space within a home.

use serde::{Deserialize, Serialize};

use crate::accessory::Accessory;
use crate::id::RoomId;

/// A named space within a home, containing accessories.
///
/// `accessories` is `None` when the room was reached through an accessory's
/// back-reference. The list is left out there so the room/accessory cycle is
/// never materialised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessories: Option<Vec<Accessory>>,
    pub handle: RoomId,
}

impl Room {
    /// Whether an accessory with the given name is listed in this room.
    ///
    /// Always `false` when the accessory list was omitted.
    #[must_use]
    pub fn contains_accessory(&self, name: &str) -> bool {
        self.accessories
            .as_deref()
            .is_some_and(|list| list.iter().any(|acc| acc.name == name))
    }
}
