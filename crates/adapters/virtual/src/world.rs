//! The in-memory object graph behind the virtual platform.
//!
//! Nodes live in flat maps keyed by handle. Parent/child links are handle
//! lists; a room's accessories are not stored but derived from the owning
//! home, so an accessory is in at most one room by construction.

use std::collections::HashMap;

use homekit_app::ports::{
    NativeAccessory, NativeCharacteristic, NativeHome, NativeRoom, NativeService, NativeZone,
};
use homekit_domain::error::NativeError;
use homekit_domain::id::{AccessoryId, CharacteristicId, HomeId, RoomId, ServiceId, ZoneId};

use crate::config::{SeedAccessory, SeedHome, VirtualConfig};
use crate::error::{
    ACCESSORY_ALREADY_ADDED, ALREADY_ASSOCIATED, INVALID_NAME, NAME_IN_USE, OBJECT_NOT_FOUND,
    SeedError, native,
};

/// Browser notification produced by a mutation, delivered once the world is unlocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Discovery {
    Found(AccessoryId),
    Removed(AccessoryId),
}

struct HomeNode {
    name: String,
    rooms: Vec<RoomId>,
    zones: Vec<ZoneId>,
    accessories: Vec<AccessoryId>,
}

struct RoomNode {
    name: String,
    home: HomeId,
}

struct ZoneNode {
    name: String,
    home: HomeId,
    rooms: Vec<RoomId>,
}

struct AccessoryNode {
    name: String,
    bridged: bool,
    home: Option<HomeId>,
    room: Option<RoomId>,
    services: Vec<ServiceId>,
}

#[derive(Default)]
pub(crate) struct World {
    order: Vec<HomeId>,
    homes: HashMap<HomeId, HomeNode>,
    rooms: HashMap<RoomId, RoomNode>,
    zones: HashMap<ZoneId, ZoneNode>,
    accessories: HashMap<AccessoryId, AccessoryNode>,
    services: HashMap<ServiceId, NativeService>,
    characteristics: HashMap<CharacteristicId, NativeCharacteristic>,
    in_range: Vec<AccessoryId>,
    discovered: Vec<AccessoryId>,
    searching: bool,
    pending: Vec<Discovery>,
}

fn check_name(name: &str) -> Result<(), NativeError> {
    if name.trim().is_empty() {
        return Err(native(INVALID_NAME));
    }
    Ok(())
}

fn check_unique<'a>(
    mut taken: impl Iterator<Item = &'a str>,
    name: &str,
) -> Result<(), NativeError> {
    check_name(name)?;
    if taken.any(|existing| existing == name) {
        return Err(native(NAME_IN_USE));
    }
    Ok(())
}

fn not_found() -> NativeError {
    native(OBJECT_NOT_FOUND)
}

impl World {
    pub(crate) fn seeded(config: &VirtualConfig) -> Result<Self, SeedError> {
        let mut world = Self::default();
        for home in &config.homes {
            world.seed_home(home)?;
        }
        for accessory in &config.accessories {
            world
                .announce(accessory)
                .map_err(|source| SeedError::Rejected {
                    name: accessory.name.clone(),
                    source,
                })?;
        }
        Ok(world)
    }

    fn seed_home(&mut self, seed: &SeedHome) -> Result<(), SeedError> {
        let rejected = |name: &str| {
            let name = name.to_string();
            move |source| SeedError::Rejected { name, source }
        };
        let home = self.add_home(&seed.name).map_err(rejected(&seed.name))?;

        let mut rooms = HashMap::new();
        for name in &seed.rooms {
            let room = self.add_room(home, name).map_err(rejected(name))?;
            rooms.insert(name.as_str(), room);
        }
        let resolve = |room: &str| {
            rooms
                .get(room)
                .copied()
                .ok_or_else(|| SeedError::UnknownRoom {
                    home: seed.name.clone(),
                    room: room.to_string(),
                })
        };

        for zone_seed in &seed.zones {
            let zone = self
                .add_zone(home, &zone_seed.name)
                .map_err(rejected(&zone_seed.name))?;
            for room in &zone_seed.rooms {
                let room = resolve(room)?;
                self.add_room_to_zone(zone, room)
                    .map_err(rejected(&zone_seed.name))?;
            }
        }

        for accessory_seed in &seed.accessories {
            let room = accessory_seed.room.as_deref().map(&resolve).transpose()?;
            let paired = self
                .homes
                .get(&home)
                .map(|node| node.accessories.clone())
                .unwrap_or_default();
            check_unique(self.accessory_names(&paired, None), &accessory_seed.name)
                .map_err(rejected(&accessory_seed.name))?;
            let accessory = self.insert_accessory(accessory_seed);
            if let Some(node) = self.accessories.get_mut(&accessory) {
                node.home = Some(home);
                node.room = room;
            }
            if let Some(node) = self.homes.get_mut(&home) {
                node.accessories.push(accessory);
            }
        }
        Ok(())
    }

    fn insert_accessory(&mut self, seed: &SeedAccessory) -> AccessoryId {
        let mut services = Vec::with_capacity(seed.services.len());
        for service in &seed.services {
            let mut characteristics = Vec::with_capacity(service.characteristics.len());
            for characteristic in &service.characteristics {
                let id = CharacteristicId::new();
                self.characteristics.insert(
                    id,
                    NativeCharacteristic {
                        id,
                        characteristic_type: characteristic.characteristic_type.clone(),
                        localized_description: characteristic.description.clone(),
                    },
                );
                characteristics.push(id);
            }
            let id = ServiceId::new();
            self.services.insert(
                id,
                NativeService {
                    id,
                    name: service.name.clone(),
                    service_type: service.service_type.clone(),
                    characteristics,
                },
            );
            services.push(id);
        }

        let id = AccessoryId::new();
        self.accessories.insert(
            id,
            AccessoryNode {
                name: seed.name.clone(),
                bridged: seed.bridged,
                home: None,
                room: None,
                services,
            },
        );
        id
    }

    pub(crate) fn take_pending(&mut self) -> Vec<Discovery> {
        std::mem::take(&mut self.pending)
    }

    // -- views

    pub(crate) fn home_ids(&self) -> Vec<HomeId> {
        self.order.clone()
    }

    pub(crate) fn home(&self, id: HomeId) -> Option<NativeHome> {
        let node = self.homes.get(&id)?;
        Some(NativeHome {
            id,
            name: node.name.clone(),
            primary: self.order.first() == Some(&id),
            rooms: node.rooms.clone(),
            accessories: node.accessories.clone(),
            zones: node.zones.clone(),
        })
    }

    pub(crate) fn room(&self, id: RoomId) -> Option<NativeRoom> {
        let node = self.rooms.get(&id)?;
        let accessories = self
            .homes
            .get(&node.home)
            .map(|home| {
                home.accessories
                    .iter()
                    .copied()
                    .filter(|acc| {
                        self.accessories
                            .get(acc)
                            .is_some_and(|acc| acc.room == Some(id))
                    })
                    .collect()
            })
            .unwrap_or_default();
        Some(NativeRoom {
            id,
            name: node.name.clone(),
            accessories,
        })
    }

    pub(crate) fn zone(&self, id: ZoneId) -> Option<NativeZone> {
        let node = self.zones.get(&id)?;
        Some(NativeZone {
            id,
            name: node.name.clone(),
            rooms: node.rooms.clone(),
        })
    }

    pub(crate) fn accessory(&self, id: AccessoryId) -> Option<NativeAccessory> {
        let node = self.accessories.get(&id)?;
        Some(NativeAccessory {
            id,
            name: node.name.clone(),
            bridged: node.bridged,
            room: node.room,
            services: node.services.clone(),
        })
    }

    pub(crate) fn service(&self, id: ServiceId) -> Option<NativeService> {
        self.services.get(&id).cloned()
    }

    pub(crate) fn characteristic(&self, id: CharacteristicId) -> Option<NativeCharacteristic> {
        self.characteristics.get(&id).cloned()
    }

    pub(crate) fn discovered(&self) -> Vec<AccessoryId> {
        self.discovered.clone()
    }

    // -- homes

    pub(crate) fn add_home(&mut self, name: &str) -> Result<HomeId, NativeError> {
        check_unique(self.homes.values().map(|home| home.name.as_str()), name)?;
        let id = HomeId::new();
        self.homes.insert(
            id,
            HomeNode {
                name: name.to_string(),
                rooms: Vec::new(),
                zones: Vec::new(),
                accessories: Vec::new(),
            },
        );
        self.order.push(id);
        Ok(id)
    }

    /// Drop a home with its rooms and zones. Its accessories go back in range.
    pub(crate) fn remove_home(&mut self, home: HomeId) -> Result<(), NativeError> {
        let paired = &self.homes.get(&home).ok_or_else(not_found)?.accessories;
        self.check_releasable(paired)?;
        let node = self.homes.remove(&home).ok_or_else(not_found)?;
        self.order.retain(|id| *id != home);
        for room in &node.rooms {
            self.rooms.remove(room);
        }
        for zone in &node.zones {
            self.zones.remove(zone);
        }
        for accessory in node.accessories {
            self.release(accessory);
        }
        Ok(())
    }

    pub(crate) fn rename_home(&mut self, home: HomeId, name: &str) -> Result<(), NativeError> {
        check_unique(
            self.homes
                .iter()
                .filter(|(id, _)| **id != home)
                .map(|(_, node)| node.name.as_str()),
            name,
        )?;
        let node = self.homes.get_mut(&home).ok_or_else(not_found)?;
        node.name = name.to_string();
        Ok(())
    }

    // -- zones

    pub(crate) fn add_zone(&mut self, home: HomeId, name: &str) -> Result<ZoneId, NativeError> {
        let node = self.homes.get(&home).ok_or_else(not_found)?;
        check_unique(self.zone_names(&node.zones, None), name)?;
        let id = ZoneId::new();
        self.zones.insert(
            id,
            ZoneNode {
                name: name.to_string(),
                home,
                rooms: Vec::new(),
            },
        );
        if let Some(node) = self.homes.get_mut(&home) {
            node.zones.push(id);
        }
        Ok(id)
    }

    pub(crate) fn remove_zone(&mut self, home: HomeId, zone: ZoneId) -> Result<(), NativeError> {
        let node = self.homes.get_mut(&home).ok_or_else(not_found)?;
        if !node.zones.contains(&zone) {
            return Err(not_found());
        }
        node.zones.retain(|id| *id != zone);
        self.zones.remove(&zone);
        Ok(())
    }

    pub(crate) fn rename_zone(&mut self, zone: ZoneId, name: &str) -> Result<(), NativeError> {
        let home = self.zones.get(&zone).ok_or_else(not_found)?.home;
        let siblings = self
            .homes
            .get(&home)
            .map(|node| node.zones.clone())
            .unwrap_or_default();
        check_unique(self.zone_names(&siblings, Some(zone)), name)?;
        if let Some(node) = self.zones.get_mut(&zone) {
            node.name = name.to_string();
        }
        Ok(())
    }

    fn zone_names<'a>(
        &'a self,
        ids: &'a [ZoneId],
        except: Option<ZoneId>,
    ) -> impl Iterator<Item = &'a str> {
        ids.iter()
            .filter(move |id| Some(**id) != except)
            .filter_map(|id| self.zones.get(id))
            .map(|zone| zone.name.as_str())
    }

    pub(crate) fn add_room_to_zone(
        &mut self,
        zone: ZoneId,
        room: RoomId,
    ) -> Result<(), NativeError> {
        let room_home = self.rooms.get(&room).ok_or_else(not_found)?.home;
        let node = self.zones.get_mut(&zone).ok_or_else(not_found)?;
        if node.home != room_home {
            return Err(not_found());
        }
        if node.rooms.contains(&room) {
            return Err(native(ALREADY_ASSOCIATED));
        }
        node.rooms.push(room);
        Ok(())
    }

    pub(crate) fn remove_room_from_zone(
        &mut self,
        zone: ZoneId,
        room: RoomId,
    ) -> Result<(), NativeError> {
        let node = self.zones.get_mut(&zone).ok_or_else(not_found)?;
        if !node.rooms.contains(&room) {
            return Err(not_found());
        }
        node.rooms.retain(|id| *id != room);
        Ok(())
    }

    // -- rooms

    pub(crate) fn add_room(&mut self, home: HomeId, name: &str) -> Result<RoomId, NativeError> {
        let node = self.homes.get(&home).ok_or_else(not_found)?;
        check_unique(self.room_names(&node.rooms, None), name)?;
        let id = RoomId::new();
        self.rooms.insert(
            id,
            RoomNode {
                name: name.to_string(),
                home,
            },
        );
        if let Some(node) = self.homes.get_mut(&home) {
            node.rooms.push(id);
        }
        Ok(id)
    }

    /// Drop a room: its accessories lose their room and zones forget it.
    pub(crate) fn remove_room(&mut self, home: HomeId, room: RoomId) -> Result<(), NativeError> {
        let node = self.homes.get_mut(&home).ok_or_else(not_found)?;
        if !node.rooms.contains(&room) {
            return Err(not_found());
        }
        node.rooms.retain(|id| *id != room);
        for zone in &node.zones {
            if let Some(zone) = self.zones.get_mut(zone) {
                zone.rooms.retain(|id| *id != room);
            }
        }
        for accessory in self.accessories.values_mut() {
            if accessory.room == Some(room) {
                accessory.room = None;
            }
        }
        self.rooms.remove(&room);
        Ok(())
    }

    pub(crate) fn rename_room(&mut self, room: RoomId, name: &str) -> Result<(), NativeError> {
        let home = self.rooms.get(&room).ok_or_else(not_found)?.home;
        let siblings = self
            .homes
            .get(&home)
            .map(|node| node.rooms.clone())
            .unwrap_or_default();
        check_unique(self.room_names(&siblings, Some(room)), name)?;
        if let Some(node) = self.rooms.get_mut(&room) {
            node.name = name.to_string();
        }
        Ok(())
    }

    fn room_names<'a>(
        &'a self,
        ids: &'a [RoomId],
        except: Option<RoomId>,
    ) -> impl Iterator<Item = &'a str> {
        ids.iter()
            .filter(move |id| Some(**id) != except)
            .filter_map(|id| self.rooms.get(id))
            .map(|room| room.name.as_str())
    }

    // -- accessories

    /// Pair an in-range accessory with a home. It stops being discoverable.
    pub(crate) fn add_accessory(
        &mut self,
        home: HomeId,
        accessory: AccessoryId,
    ) -> Result<(), NativeError> {
        let paired = &self.homes.get(&home).ok_or_else(not_found)?.accessories;
        let node = self.accessories.get(&accessory).ok_or_else(not_found)?;
        if node.home.is_some() {
            return Err(native(ACCESSORY_ALREADY_ADDED));
        }
        if !self.in_range.contains(&accessory) {
            return Err(not_found());
        }
        check_unique(self.accessory_names(paired, None), &node.name)?;
        if let Some(node) = self.accessories.get_mut(&accessory) {
            node.home = Some(home);
        }
        self.in_range.retain(|id| *id != accessory);
        if let Some(position) = self.discovered.iter().position(|id| *id == accessory) {
            self.discovered.remove(position);
            self.pending.push(Discovery::Removed(accessory));
        }
        if let Some(node) = self.homes.get_mut(&home) {
            node.accessories.push(accessory);
        }
        Ok(())
    }

    pub(crate) fn remove_accessory(
        &mut self,
        home: HomeId,
        accessory: AccessoryId,
    ) -> Result<(), NativeError> {
        let node = self.homes.get(&home).ok_or_else(not_found)?;
        if !node.accessories.contains(&accessory) {
            return Err(not_found());
        }
        self.check_releasable(&[accessory])?;
        if let Some(node) = self.homes.get_mut(&home) {
            node.accessories.retain(|id| *id != accessory);
        }
        self.release(accessory);
        Ok(())
    }

    pub(crate) fn assign_accessory_to_room(
        &mut self,
        home: HomeId,
        accessory: AccessoryId,
        room: RoomId,
    ) -> Result<(), NativeError> {
        let node = self.homes.get(&home).ok_or_else(not_found)?;
        if !node.accessories.contains(&accessory) || !node.rooms.contains(&room) {
            return Err(not_found());
        }
        let accessory = self.accessories.get_mut(&accessory).ok_or_else(not_found)?;
        accessory.room = Some(room);
        Ok(())
    }

    /// Paired accessories are named uniquely within their home, unpaired ones
    /// among everything in range.
    pub(crate) fn rename_accessory(
        &mut self,
        accessory: AccessoryId,
        name: &str,
    ) -> Result<(), NativeError> {
        let node = self.accessories.get(&accessory).ok_or_else(not_found)?;
        let siblings = match node.home {
            Some(home) => self
                .homes
                .get(&home)
                .map(|home| home.accessories.clone())
                .unwrap_or_default(),
            None => self.in_range.clone(),
        };
        check_unique(self.accessory_names(&siblings, Some(accessory)), name)?;
        if let Some(node) = self.accessories.get_mut(&accessory) {
            node.name = name.to_string();
        }
        Ok(())
    }

    fn accessory_names<'a>(
        &'a self,
        ids: &'a [AccessoryId],
        except: Option<AccessoryId>,
    ) -> impl Iterator<Item = &'a str> {
        ids.iter()
            .filter(move |id| Some(**id) != except)
            .filter_map(|id| self.accessories.get(id))
            .map(|accessory| accessory.name.as_str())
    }

    /// Accessories going back in range must not clash with one already there.
    fn check_releasable(&self, accessories: &[AccessoryId]) -> Result<(), NativeError> {
        for name in self.accessory_names(accessories, None) {
            let mut taken = self.accessory_names(&self.in_range, None);
            if taken.any(|existing| existing == name) {
                return Err(native(NAME_IN_USE));
            }
        }
        Ok(())
    }

    /// Unpair an accessory: it is back in range and rediscovered while searching.
    fn release(&mut self, accessory: AccessoryId) {
        if let Some(node) = self.accessories.get_mut(&accessory) {
            node.home = None;
            node.room = None;
        }
        self.in_range.push(accessory);
        if self.searching {
            self.discover(accessory);
        }
    }

    // -- browsing

    pub(crate) fn is_searching(&self) -> bool {
        self.searching
    }

    pub(crate) fn start_searching(&mut self) {
        self.searching = true;
        for accessory in self.in_range.clone() {
            self.discover(accessory);
        }
    }

    pub(crate) fn stop_searching(&mut self) {
        self.searching = false;
    }

    fn discover(&mut self, accessory: AccessoryId) {
        if !self.discovered.contains(&accessory) {
            self.discovered.push(accessory);
            self.pending.push(Discovery::Found(accessory));
        }
    }

    /// Bring a new unpaired accessory in range.
    pub(crate) fn announce(&mut self, seed: &SeedAccessory) -> Result<AccessoryId, NativeError> {
        check_unique(self.accessory_names(&self.in_range, None), &seed.name)?;
        let id = self.insert_accessory(seed);
        self.in_range.push(id);
        if self.searching {
            self.discover(id);
        }
        Ok(id)
    }

    /// Take an unpaired accessory out of range. The node stays readable.
    pub(crate) fn withdraw(&mut self, name: &str) -> Option<AccessoryId> {
        let position = self.in_range.iter().position(|id| {
            self.accessories
                .get(id)
                .is_some_and(|node| node.name == name)
        })?;
        let id = self.in_range.remove(position);
        if let Some(position) = self.discovered.iter().position(|acc| *acc == id) {
            self.discovered.remove(position);
            self.pending.push(Discovery::Removed(id));
        }
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SeedService, SeedZone};

    fn cabin() -> SeedHome {
        SeedHome {
            name: "Cabin".to_string(),
            rooms: vec!["Kitchen".to_string(), "Den".to_string()],
            zones: vec![SeedZone {
                name: "Downstairs".to_string(),
                rooms: vec!["Kitchen".to_string()],
            }],
            accessories: vec![SeedAccessory {
                room: Some("Kitchen".to_string()),
                ..SeedAccessory::with_service("Kettle", "public.hap.service.outlet")
            }],
        }
    }

    fn world() -> World {
        let lamp = SeedAccessory::with_service("Lamp", "public.hap.service.lightbulb");
        World::seeded(&VirtualConfig {
            homes: vec![cabin()],
            accessories: vec![lamp],
        })
        .unwrap()
    }

    fn first_home(world: &World) -> NativeHome {
        world.home(world.home_ids()[0]).unwrap()
    }

    fn room_named(world: &World, home: &NativeHome, name: &str) -> RoomId {
        *home
            .rooms
            .iter()
            .find(|id| world.room(**id).unwrap().name == name)
            .unwrap()
    }

    #[test]
    fn should_seed_homes_rooms_zones_and_accessories() {
        let world = world();
        let home = first_home(&world);
        assert_eq!(home.name, "Cabin");
        assert!(home.primary);
        assert_eq!(home.rooms.len(), 2);

        let kitchen = room_named(&world, &home, "Kitchen");
        let zone = world.zone(home.zones[0]).unwrap();
        assert_eq!(zone.rooms, vec![kitchen]);

        let kettle = world.accessory(home.accessories[0]).unwrap();
        assert_eq!(kettle.room, Some(kitchen));
        assert_eq!(world.room(kitchen).unwrap().accessories, vec![kettle.id]);
        assert_eq!(
            world.service(kettle.services[0]).unwrap().name.as_deref(),
            Some("Kettle")
        );
    }

    #[test]
    fn should_reject_seed_with_unknown_room() {
        let mut home = cabin();
        home.zones[0].rooms.push("Attic".to_string());
        let err = World::seeded(&VirtualConfig {
            homes: vec![home],
            accessories: Vec::new(),
        })
        .err()
        .unwrap();
        assert_eq!(err.to_string(), "home 'Cabin' has no room named 'Attic'");
    }

    #[test]
    fn should_reject_empty_and_duplicate_names() {
        let mut world = world();
        assert_eq!(world.add_home("  ").unwrap_err().to_string(), INVALID_NAME);
        assert_eq!(
            world.add_home("Cabin").unwrap_err().to_string(),
            NAME_IN_USE
        );

        let home = first_home(&world).id;
        assert_eq!(
            world.add_room(home, "Den").unwrap_err().to_string(),
            NAME_IN_USE
        );
        let den = room_named(&world, &first_home(&world), "Den");
        assert_eq!(
            world.rename_room(den, "Kitchen").unwrap_err().to_string(),
            NAME_IN_USE
        );
        world.rename_room(den, "Den").unwrap();
    }

    #[test]
    fn should_allow_same_room_name_in_different_homes() {
        let mut world = world();
        let loft = world.add_home("Loft").unwrap();
        world.add_room(loft, "Kitchen").unwrap();
    }

    #[test]
    fn should_promote_next_home_when_primary_removed() {
        let mut world = world();
        let cabin = first_home(&world).id;
        let loft = world.add_home("Loft").unwrap();
        assert!(!world.home(loft).unwrap().primary);

        world.remove_home(cabin).unwrap();
        assert!(world.home(loft).unwrap().primary);
        assert!(world.home(cabin).is_none());
    }

    #[test]
    fn should_forget_removed_room_in_zones_and_accessories() {
        let mut world = world();
        let home = first_home(&world);
        let kitchen = room_named(&world, &home, "Kitchen");

        world.remove_room(home.id, kitchen).unwrap();

        assert!(world.room(kitchen).is_none());
        assert!(world.zone(home.zones[0]).unwrap().rooms.is_empty());
        assert_eq!(world.accessory(home.accessories[0]).unwrap().room, None);
    }

    #[test]
    fn should_reject_room_already_in_zone() {
        let mut world = world();
        let home = first_home(&world);
        let kitchen = room_named(&world, &home, "Kitchen");
        assert_eq!(
            world
                .add_room_to_zone(home.zones[0], kitchen)
                .unwrap_err()
                .to_string(),
            ALREADY_ASSOCIATED
        );
    }

    #[test]
    fn should_report_discovery_only_while_searching() {
        let mut world = world();
        assert!(world.discovered().is_empty());
        assert!(world.take_pending().is_empty());

        world.start_searching();
        let lamp = world.discovered()[0];
        assert_eq!(world.take_pending(), vec![Discovery::Found(lamp)]);

        world.start_searching();
        assert!(world.take_pending().is_empty());
    }

    #[test]
    fn should_stop_discovering_accessory_once_paired() {
        let mut world = world();
        world.start_searching();
        world.take_pending();
        let home = first_home(&world).id;
        let lamp = world.discovered()[0];

        world.add_accessory(home, lamp).unwrap();

        assert!(world.discovered().is_empty());
        assert_eq!(world.take_pending(), vec![Discovery::Removed(lamp)]);
        assert!(first_home(&world).accessories.contains(&lamp));
        assert_eq!(
            world.add_accessory(home, lamp).unwrap_err().to_string(),
            ACCESSORY_ALREADY_ADDED
        );
    }

    #[test]
    fn should_rediscover_accessory_removed_from_home() {
        let mut world = world();
        world.start_searching();
        world.take_pending();
        let home = first_home(&world);
        let kettle = home.accessories[0];

        world.remove_accessory(home.id, kettle).unwrap();

        assert_eq!(world.take_pending(), vec![Discovery::Found(kettle)]);
        assert_eq!(world.accessory(kettle).unwrap().room, None);
        assert!(world.discovered().contains(&kettle));
    }

    #[test]
    fn should_withdraw_discovered_accessory() {
        let mut world = world();
        world.start_searching();
        world.take_pending();

        let lamp = world.withdraw("Lamp").unwrap();

        assert_eq!(world.take_pending(), vec![Discovery::Removed(lamp)]);
        assert!(world.accessory(lamp).is_some());
        assert!(world.withdraw("Lamp").is_none());
    }

    #[test]
    fn should_announce_new_accessory_while_searching() {
        let mut world = World::default();
        world.start_searching();
        let plug = world
            .announce(&SeedAccessory {
                services: vec![SeedService {
                    name: None,
                    service_type: "public.hap.service.accessory-information".to_string(),
                    characteristics: Vec::new(),
                }],
                ..SeedAccessory::with_service("Plug", "public.hap.service.outlet")
            })
            .unwrap();
        assert_eq!(world.take_pending(), vec![Discovery::Found(plug)]);
    }

    #[test]
    fn should_reject_duplicate_accessory_name() {
        let mut world = world();
        let fan = SeedAccessory::with_service("Fan", "public.hap.service.fan");
        let fan = world.announce(&fan).unwrap();
        world.start_searching();
        world.take_pending();

        assert_eq!(
            world.rename_accessory(fan, "Lamp").unwrap_err().to_string(),
            NAME_IN_USE
        );
        let lamp = SeedAccessory::with_service("Lamp", "public.hap.service.outlet");
        assert_eq!(
            world.announce(&lamp).unwrap_err().to_string(),
            NAME_IN_USE
        );
        assert!(world.take_pending().is_empty());
        assert_eq!(world.discovered().len(), 2);
        world.rename_accessory(fan, "Fan").unwrap();

        let home = first_home(&world).id;
        let kettle = first_home(&world).accessories[0];
        world.rename_accessory(fan, "Kettle").unwrap();
        assert_eq!(
            world.add_accessory(home, fan).unwrap_err().to_string(),
            NAME_IN_USE
        );
        assert_eq!(
            world
                .remove_accessory(home, kettle)
                .unwrap_err()
                .to_string(),
            NAME_IN_USE
        );
        assert_eq!(
            world.remove_home(home).unwrap_err().to_string(),
            NAME_IN_USE
        );
        assert!(first_home(&world).accessories.contains(&kettle));
    }

    #[test]
    fn should_reject_duplicate_accessory_name_in_seeded_home() {
        let mut home = cabin();
        let switch = SeedAccessory::with_service("Kettle", "public.hap.service.switch");
        home.accessories.push(switch);
        let err = World::seeded(&VirtualConfig {
            homes: vec![home],
            accessories: Vec::new(),
        })
        .err()
        .unwrap();
        assert_eq!(err.to_string(), "failed to seed 'Kettle'");
        assert_eq!(
            std::error::Error::source(&err).unwrap().to_string(),
            NAME_IN_USE
        );

        let err = World::seeded(&VirtualConfig {
            homes: Vec::new(),
            accessories: vec![
                SeedAccessory::with_service("Plug", "public.hap.service.outlet"),
                SeedAccessory::with_service("Plug", "public.hap.service.outlet"),
            ],
        })
        .err()
        .unwrap();
        assert_eq!(err.to_string(), "failed to seed 'Plug'");
    }
}
