//! Lookup layer: resolve a name to a native node within a scope.
//!
//! Linear scan over the live native collection, first exact (case-sensitive)
//! match wins. Nothing is indexed or cached: the native collections are the
//! source of truth and may change between calls.

use homekit_domain::id::AccessoryId;

use crate::ports::{
    AccessoryBrowser, HomeManager, NativeAccessory, NativeGraph, NativeHome, NativeRoom,
    NativeZone,
};

pub fn find_home<M: HomeManager>(manager: &M, name: &str) -> Option<NativeHome> {
    manager
        .homes()
        .into_iter()
        .filter_map(|id| manager.home(id))
        .find(|home| home.name == name)
}

pub fn find_zone<G: NativeGraph + ?Sized>(
    graph: &G,
    name: &str,
    in_home: &NativeHome,
) -> Option<NativeZone> {
    in_home
        .zones
        .iter()
        .filter_map(|id| graph.zone(*id))
        .find(|zone| zone.name == name)
}

pub fn find_room<G: NativeGraph + ?Sized>(
    graph: &G,
    name: &str,
    in_home: &NativeHome,
) -> Option<NativeRoom> {
    in_home
        .rooms
        .iter()
        .filter_map(|id| graph.room(*id))
        .find(|room| room.name == name)
}

/// Search the accessories discovered by the browser.
pub fn find_accessory<B: AccessoryBrowser>(browser: &B, name: &str) -> Option<NativeAccessory> {
    find_accessory_among(browser, name, &browser.discovered_accessories())
}

/// Search the accessories that belong to a home.
pub fn find_accessory_in_home<G: NativeGraph + ?Sized>(
    graph: &G,
    name: &str,
    in_home: &NativeHome,
) -> Option<NativeAccessory> {
    find_accessory_among(graph, name, &in_home.accessories)
}

fn find_accessory_among<G: NativeGraph + ?Sized>(
    graph: &G,
    name: &str,
    ids: &[AccessoryId],
) -> Option<NativeAccessory> {
    ids.iter()
        .filter_map(|id| graph.accessory(*id))
        .find(|acc| acc.name == name)
}
