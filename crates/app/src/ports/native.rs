//! Native framework port: the object graph, its mutations and its delegates.
//!
//! The native layer owns every home, room, zone and accessory. The adapter
//! only ever holds handles and reads node views through [`NativeGraph`];
//! child collections are handle lists, so the room/accessory cycle exists
//! only as identifiers.
//!
//! Mutations follow the completion-handler shape of the platform: each one
//! is a future that resolves once the native layer reports success or a
//! [`NativeError`].

use std::future::Future;
use std::sync::Arc;

use homekit_domain::error::NativeError;
use homekit_domain::id::{AccessoryId, CharacteristicId, HomeId, RoomId, ServiceId, ZoneId};

/// Native view of a home.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeHome {
    pub id: HomeId,
    pub name: String,
    pub primary: bool,
    pub rooms: Vec<RoomId>,
    pub accessories: Vec<AccessoryId>,
    pub zones: Vec<ZoneId>,
}

/// Native view of a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeRoom {
    pub id: RoomId,
    pub name: String,
    pub accessories: Vec<AccessoryId>,
}

/// Native view of a zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeZone {
    pub id: ZoneId,
    pub name: String,
    pub rooms: Vec<RoomId>,
}

/// Native view of an accessory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeAccessory {
    pub id: AccessoryId,
    pub name: String,
    pub bridged: bool,
    pub room: Option<RoomId>,
    pub services: Vec<ServiceId>,
}

/// Native view of a service. Internal services have no name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeService {
    pub id: ServiceId,
    pub name: Option<String>,
    pub service_type: String,
    pub characteristics: Vec<CharacteristicId>,
}

/// Native view of a characteristic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeCharacteristic {
    pub id: CharacteristicId,
    pub characteristic_type: String,
    pub localized_description: String,
}

/// Read access to the live native object graph.
///
/// Every lookup returns `None` for a handle the native layer no longer knows.
pub trait NativeGraph: Send + Sync {
    fn home(&self, id: HomeId) -> Option<NativeHome>;

    fn room(&self, id: RoomId) -> Option<NativeRoom>;

    fn zone(&self, id: ZoneId) -> Option<NativeZone>;

    fn accessory(&self, id: AccessoryId) -> Option<NativeAccessory>;

    fn service(&self, id: ServiceId) -> Option<NativeService>;

    fn characteristic(&self, id: CharacteristicId) -> Option<NativeCharacteristic>;
}

/// Receives home-list change notifications from the native home manager.
pub trait HomeManagerDelegate: Send + Sync {
    fn home_manager_did_update_homes(&self);
}

/// Receives discovery notifications from the native accessory browser.
pub trait AccessoryBrowserDelegate: Send + Sync {
    fn accessory_browser_did_find_new_accessory(&self, accessory: AccessoryId);

    fn accessory_browser_did_remove_new_accessory(&self, accessory: AccessoryId);
}

/// The native home manager: owner of the home list.
pub trait HomeManager: NativeGraph {
    /// Current homes, in native order.
    fn homes(&self) -> Vec<HomeId>;

    /// Replace the delegate. The previous one no longer receives events.
    fn set_delegate(&self, delegate: Arc<dyn HomeManagerDelegate>);

    fn add_home(&self, name: &str) -> impl Future<Output = Result<HomeId, NativeError>> + Send;

    fn remove_home(&self, home: HomeId) -> impl Future<Output = Result<(), NativeError>> + Send;

    fn update_home_name(
        &self,
        home: HomeId,
        name: &str,
    ) -> impl Future<Output = Result<(), NativeError>> + Send;

    fn add_zone(
        &self,
        home: HomeId,
        name: &str,
    ) -> impl Future<Output = Result<ZoneId, NativeError>> + Send;

    fn remove_zone(
        &self,
        home: HomeId,
        zone: ZoneId,
    ) -> impl Future<Output = Result<(), NativeError>> + Send;

    fn update_zone_name(
        &self,
        zone: ZoneId,
        name: &str,
    ) -> impl Future<Output = Result<(), NativeError>> + Send;

    fn add_room(
        &self,
        home: HomeId,
        name: &str,
    ) -> impl Future<Output = Result<RoomId, NativeError>> + Send;

    fn remove_room(
        &self,
        home: HomeId,
        room: RoomId,
    ) -> impl Future<Output = Result<(), NativeError>> + Send;

    fn update_room_name(
        &self,
        room: RoomId,
        name: &str,
    ) -> impl Future<Output = Result<(), NativeError>> + Send;

    fn add_room_to_zone(
        &self,
        zone: ZoneId,
        room: RoomId,
    ) -> impl Future<Output = Result<(), NativeError>> + Send;

    fn remove_room_from_zone(
        &self,
        zone: ZoneId,
        room: RoomId,
    ) -> impl Future<Output = Result<(), NativeError>> + Send;

    fn add_accessory(
        &self,
        home: HomeId,
        accessory: AccessoryId,
    ) -> impl Future<Output = Result<(), NativeError>> + Send;

    fn remove_accessory(
        &self,
        home: HomeId,
        accessory: AccessoryId,
    ) -> impl Future<Output = Result<(), NativeError>> + Send;

    fn assign_accessory_to_room(
        &self,
        home: HomeId,
        accessory: AccessoryId,
        room: RoomId,
    ) -> impl Future<Output = Result<(), NativeError>> + Send;
}

/// The native accessory browser: discovers accessories not yet in any home.
pub trait AccessoryBrowser: NativeGraph {
    /// Accessories found so far, in discovery order.
    fn discovered_accessories(&self) -> Vec<AccessoryId>;

    /// Replace the delegate. The previous one no longer receives events.
    fn set_delegate(&self, delegate: Arc<dyn AccessoryBrowserDelegate>);

    fn start_searching(&self);

    fn stop_searching(&self);

    fn update_accessory_name(
        &self,
        accessory: AccessoryId,
        name: &str,
    ) -> impl Future<Output = Result<(), NativeError>> + Send;
}

/// Creates the native singletons on demand.
///
/// Calling a factory method is the equivalent of instantiating the platform
/// object; the adapter decides when that happens and keeps the result.
pub trait Platform {
    type HomeManager: HomeManager + 'static;
    type AccessoryBrowser: AccessoryBrowser + 'static;

    /// Whether the platform framework is usable at all.
    fn available(&self) -> bool {
        true
    }

    fn home_manager(&self) -> Self::HomeManager;

    fn accessory_browser(&self) -> Self::AccessoryBrowser;
}
