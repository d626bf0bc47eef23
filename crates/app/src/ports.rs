//! Port definitions: traits that native framework bindings implement.
//!
//! Ports are the boundaries between the adapter core and the platform.
//! They are defined here (in `app`) so that both the adapter and the
//! platform bindings can depend on them without creating circular dependencies.

pub mod native;

pub use native::{
    AccessoryBrowser, AccessoryBrowserDelegate, HomeManager, HomeManagerDelegate, NativeAccessory,
    NativeCharacteristic, NativeGraph, NativeHome, NativeRoom, NativeService, NativeZone, Platform,
};
