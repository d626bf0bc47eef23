//! Service and characteristic: the capabilities an accessory exposes.

use serde::{Deserialize, Serialize};

use crate::id::{CharacteristicId, ServiceId};

/// A named capability of an accessory (e.g. "Lightbulb").
///
/// Only named services are ever surfaced; unnamed ones are internal to the
/// accessory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    #[serde(rename = "type")]
    pub service_type: String,
    pub characteristics: Vec<Characteristic>,
    pub handle: ServiceId,
}

impl Service {
    /// First characteristic with the given type.
    #[must_use]
    pub fn characteristic(&self, characteristic_type: &str) -> Option<&Characteristic> {
        self.characteristics
            .iter()
            .find(|c| c.characteristic_type == characteristic_type)
    }
}

/// A readable/writable property of a service (e.g. "Brightness").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Characteristic {
    #[serde(rename = "type")]
    pub characteristic_type: String,
    pub description: String,
    pub handle: CharacteristicId,
}
