//! Seed configuration for the virtual platform.

use serde::Deserialize;

/// What the virtual native layer contains when it is created.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VirtualConfig {
    /// Homes that already exist, with their rooms, zones and accessories.
    pub homes: Vec<SeedHome>,
    /// Accessories in range but not yet added to any home.
    pub accessories: Vec<SeedAccessory>,
}

/// A pre-existing home.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeedHome {
    pub name: String,
    pub rooms: Vec<String>,
    pub zones: Vec<SeedZone>,
    /// Accessories already paired with this home. `room` must name one of `rooms`.
    pub accessories: Vec<SeedAccessory>,
}

/// A zone and the names of the rooms it groups.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeedZone {
    pub name: String,
    pub rooms: Vec<String>,
}

/// An accessory and the services it exposes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeedAccessory {
    pub name: String,
    pub bridged: bool,
    pub room: Option<String>,
    pub services: Vec<SeedService>,
}

/// A service. Leave `name` out for an internal service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeedService {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub service_type: String,
    pub characteristics: Vec<SeedCharacteristic>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeedCharacteristic {
    #[serde(rename = "type")]
    pub characteristic_type: String,
    pub description: String,
}

impl SeedAccessory {
    /// An accessory with one named service.
    #[must_use]
    pub fn with_service(name: &str, service_type: &str) -> Self {
        Self {
            name: name.to_string(),
            services: vec![SeedService {
                name: Some(name.to_string()),
                service_type: service_type.to_string(),
                characteristics: Vec::new(),
            }],
            ..Self::default()
        }
    }
}

impl Default for VirtualConfig {
    fn default() -> Self {
        Self {
            homes: vec![SeedHome {
                name: "My Home".to_string(),
                rooms: vec!["Living Room".to_string(), "Bedroom".to_string()],
                zones: Vec::new(),
                accessories: Vec::new(),
            }],
            accessories: vec![
                SeedAccessory {
                    name: "Desk Lamp".to_string(),
                    bridged: false,
                    room: None,
                    services: vec![
                        SeedService {
                            name: None,
                            service_type: "public.hap.service.accessory-information".to_string(),
                            characteristics: vec![SeedCharacteristic {
                                characteristic_type: "public.hap.characteristic.identify"
                                    .to_string(),
                                description: "Identify".to_string(),
                            }],
                        },
                        SeedService {
                            name: Some("Desk Lamp".to_string()),
                            service_type: "public.hap.service.lightbulb".to_string(),
                            characteristics: vec![
                                SeedCharacteristic {
                                    characteristic_type: "public.hap.characteristic.on"
                                        .to_string(),
                                    description: "Power State".to_string(),
                                },
                                SeedCharacteristic {
                                    characteristic_type: "public.hap.characteristic.brightness"
                                        .to_string(),
                                    description: "Brightness".to_string(),
                                },
                            ],
                        },
                    ],
                },
                SeedAccessory {
                    name: "Porch Sensor".to_string(),
                    bridged: true,
                    room: None,
                    services: vec![SeedService {
                        name: Some("Porch Temperature".to_string()),
                        service_type: "public.hap.service.sensor.temperature".to_string(),
                        characteristics: vec![SeedCharacteristic {
                            characteristic_type: "public.hap.characteristic.temperature.current"
                                .to_string(),
                            description: "Current Temperature".to_string(),
                        }],
                    }],
                },
            ],
        }
    }
}
