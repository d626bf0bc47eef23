//! Transform layer: native node views to plain value records.
//!
//! Every function here is pure and total: handles the graph no longer
//! resolves are skipped, never reported. Collections are recursed into
//! (home → rooms → accessories → services → characteristics), except for the
//! room reached from an accessory, whose accessory list is left out.

use homekit_domain::accessory::Accessory;
use homekit_domain::home::Home;
use homekit_domain::id::{AccessoryId, CharacteristicId, HomeId, RoomId, ServiceId, ZoneId};
use homekit_domain::room::Room;
use homekit_domain::service::{Characteristic, Service};
use homekit_domain::zone::Zone;

use crate::ports::{
    NativeAccessory, NativeCharacteristic, NativeGraph, NativeHome, NativeRoom, NativeService,
    NativeZone,
};

pub fn home<G: NativeGraph + ?Sized>(graph: &G, native: &NativeHome) -> Home {
    Home {
        name: native.name.clone(),
        primary: native.primary,
        rooms: rooms(graph, &native.rooms),
        accessories: accessories(graph, &native.accessories),
        zones: zones(graph, &native.zones),
        handle: native.id,
    }
}

pub fn homes<G: NativeGraph + ?Sized>(graph: &G, ids: &[HomeId]) -> Vec<Home> {
    ids.iter()
        .filter_map(|id| graph.home(*id))
        .map(|native| home(graph, &native))
        .collect()
}

/// Transform a room, leaving out its accessories when `skip_accessories` is set.
pub fn room<G: NativeGraph + ?Sized>(
    graph: &G,
    native: &NativeRoom,
    skip_accessories: bool,
) -> Room {
    Room {
        name: native.name.clone(),
        accessories: (!skip_accessories).then(|| accessories(graph, &native.accessories)),
        handle: native.id,
    }
}

/// Transform an optional room reference. An absent or dangling handle yields `None`.
pub fn room_ref<G: NativeGraph + ?Sized>(
    graph: &G,
    id: Option<RoomId>,
    skip_accessories: bool,
) -> Option<Room> {
    let native = graph.room(id?)?;
    Some(room(graph, &native, skip_accessories))
}

pub fn rooms<G: NativeGraph + ?Sized>(graph: &G, ids: &[RoomId]) -> Vec<Room> {
    ids.iter()
        .filter_map(|id| graph.room(*id))
        .map(|native| room(graph, &native, false))
        .collect()
}

/// Transform an accessory. Its room back-reference never carries accessories.
pub fn accessory<G: NativeGraph + ?Sized>(graph: &G, native: &NativeAccessory) -> Accessory {
    Accessory {
        name: native.name.clone(),
        bridged: native.bridged,
        room: room_ref(graph, native.room, true),
        services: services(graph, &native.services),
        handle: native.id,
    }
}

pub fn accessories<G: NativeGraph + ?Sized>(graph: &G, ids: &[AccessoryId]) -> Vec<Accessory> {
    ids.iter()
        .filter_map(|id| graph.accessory(*id))
        .map(|native| accessory(graph, &native))
        .collect()
}

pub fn zone<G: NativeGraph + ?Sized>(graph: &G, native: &NativeZone) -> Zone {
    Zone {
        name: native.name.clone(),
        rooms: rooms(graph, &native.rooms),
        handle: native.id,
    }
}

pub fn zones<G: NativeGraph + ?Sized>(graph: &G, ids: &[ZoneId]) -> Vec<Zone> {
    ids.iter()
        .filter_map(|id| graph.zone(*id))
        .map(|native| zone(graph, &native))
        .collect()
}

/// Transform a service, or `None` when it has no name.
pub fn service<G: NativeGraph + ?Sized>(graph: &G, native: &NativeService) -> Option<Service> {
    let name = native.name.as_deref().filter(|name| !name.is_empty())?;
    Some(Service {
        name: name.to_string(),
        service_type: native.service_type.clone(),
        characteristics: characteristics(graph, &native.characteristics),
        handle: native.id,
    })
}

/// Unnamed services are internal to the accessory and are dropped.
pub fn services<G: NativeGraph + ?Sized>(graph: &G, ids: &[ServiceId]) -> Vec<Service> {
    ids.iter()
        .filter_map(|id| graph.service(*id))
        .filter_map(|native| service(graph, &native))
        .collect()
}

#[must_use]
pub fn characteristic(native: &NativeCharacteristic) -> Characteristic {
    Characteristic {
        characteristic_type: native.characteristic_type.clone(),
        description: native.localized_description.clone(),
        handle: native.id,
    }
}

pub fn characteristics<G: NativeGraph + ?Sized>(
    graph: &G,
    ids: &[CharacteristicId],
) -> Vec<Characteristic> {
    ids.iter()
        .filter_map(|id| graph.characteristic(*id))
        .map(|native| characteristic(&native))
        .collect()
}
