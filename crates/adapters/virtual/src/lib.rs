//! # homekit-adapter-virtual
//!
//! Virtual native framework: an in-memory home manager and accessory browser
//! for testing and demonstration.
//!
//! ## Behaviour
//!
//! | Object | Rule |
//! |--------|------|
//! | Home | Name non-empty and unique; the first home is primary |
//! | Room, zone | Name non-empty and unique within the home |
//! | Zone membership | A room joins a zone of its own home at most once |
//! | Accessory | Paired with at most one home, in at most one room |
//! | Accessory name | Unique within its home, or among unpaired accessories in range |
//! | Browser | Reports in-range accessories while searching, and their removal once paired or withdrawn |
//!
//! The home manager delegate is called when it is installed and after every
//! successful mutation.
//!
//! ## Dependency rule
//!
//! Depends on `homekit-app` (port traits) and `homekit-domain` only.

mod config;
mod error;
mod platform;
mod world;

pub use config::{
    SeedAccessory, SeedCharacteristic, SeedHome, SeedService, SeedZone, VirtualConfig,
};
pub use error::SeedError;
pub use platform::{VirtualAccessoryBrowser, VirtualHomeManager, VirtualPlatform};
