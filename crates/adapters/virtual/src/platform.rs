//! Virtual home manager and accessory browser over a shared [`World`].
//!
//! Every object handed out by one [`VirtualPlatform`] (and its clones) sees
//! the same world. Delegates are called after the world lock is released, so
//! they may read the graph back.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use homekit_app::ports::{
    AccessoryBrowser, AccessoryBrowserDelegate, HomeManager, HomeManagerDelegate, NativeAccessory,
    NativeCharacteristic, NativeGraph, NativeHome, NativeRoom, NativeService, NativeZone,
    Platform,
};
use homekit_domain::error::NativeError;
use homekit_domain::id::{AccessoryId, CharacteristicId, HomeId, RoomId, ServiceId, ZoneId};

use crate::config::{SeedAccessory, VirtualConfig};
use crate::error::{SeedError, native};
use crate::world::{Discovery, World};

#[derive(Default)]
struct Shared {
    world: Mutex<World>,
    manager_delegate: Mutex<Option<Arc<dyn HomeManagerDelegate>>>,
    browser_delegate: Mutex<Option<Arc<dyn AccessoryBrowserDelegate>>>,
    fail_next: Mutex<Option<String>>,
    mutations: AtomicUsize,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Shared {
    fn world(&self) -> MutexGuard<'_, World> {
        lock(&self.world)
    }

    /// Apply a mutation, then notify the delegates outside the lock.
    fn mutate<T>(
        &self,
        operation: &'static str,
        apply: impl FnOnce(&mut World) -> Result<T, NativeError>,
    ) -> Result<T, NativeError> {
        if let Some(description) = lock(&self.fail_next).take() {
            tracing::debug!(operation, "virtual failure injected");
            return Err(native(&description));
        }

        let (result, discoveries) = {
            let mut world = self.world();
            let result = apply(&mut world);
            (result, world.take_pending())
        };

        match &result {
            Ok(_) => {
                self.mutations.fetch_add(1, Ordering::SeqCst);
                tracing::debug!(operation, "virtual mutation applied");
                self.notify_homes_updated();
            }
            Err(err) => tracing::debug!(operation, error = %err, "virtual mutation rejected"),
        }
        self.dispatch(discoveries);
        result
    }

    fn notify_homes_updated(&self) {
        let delegate = lock(&self.manager_delegate).clone();
        if let Some(delegate) = delegate {
            delegate.home_manager_did_update_homes();
        }
    }

    fn dispatch(&self, discoveries: Vec<Discovery>) {
        if discoveries.is_empty() {
            return;
        }
        let Some(delegate) = lock(&self.browser_delegate).clone() else {
            return;
        };
        for discovery in discoveries {
            match discovery {
                Discovery::Found(id) => delegate.accessory_browser_did_find_new_accessory(id),
                Discovery::Removed(id) => delegate.accessory_browser_did_remove_new_accessory(id),
            }
        }
    }
}

/// In-memory native framework.
#[derive(Clone, Default)]
pub struct VirtualPlatform {
    shared: Arc<Shared>,
}

impl VirtualPlatform {
    /// Build a platform seeded from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError`] when a seeded name is rejected or a zone or
    /// accessory refers to an unknown room.
    pub fn from_config(config: &VirtualConfig) -> Result<Self, SeedError> {
        let world = World::seeded(config)?;
        tracing::info!(
            homes = config.homes.len(),
            in_range = config.accessories.len(),
            "virtual platform seeded"
        );
        Ok(Self {
            shared: Arc::new(Shared {
                world: Mutex::new(world),
                ..Shared::default()
            }),
        })
    }

    /// Bring a new accessory in range. It is reported at once while searching.
    ///
    /// # Errors
    ///
    /// Returns [`NativeError`] when the name is empty or another accessory in
    /// range already uses it.
    pub fn announce(&self, accessory: &SeedAccessory) -> Result<AccessoryId, NativeError> {
        let (result, discoveries) = {
            let mut world = self.shared.world();
            let result = world.announce(accessory);
            (result, world.take_pending())
        };
        match &result {
            Ok(_) => tracing::debug!(accessory = %accessory.name, "accessory announced"),
            Err(err) => {
                tracing::debug!(accessory = %accessory.name, error = %err, "accessory refused");
            }
        }
        self.shared.dispatch(discoveries);
        result
    }

    /// Take an unpaired accessory out of range.
    pub fn withdraw(&self, name: &str) -> Option<AccessoryId> {
        let (id, discoveries) = {
            let mut world = self.shared.world();
            let id = world.withdraw(name);
            (id, world.take_pending())
        };
        tracing::debug!(
            accessory = name,
            found = id.is_some(),
            "accessory withdrawn"
        );
        self.shared.dispatch(discoveries);
        id
    }

    /// Make the next mutation fail with `description`.
    pub fn fail_next(&self, description: &str) {
        *lock(&self.shared.fail_next) = Some(description.to_string());
    }

    /// Number of mutations applied so far.
    #[must_use]
    pub fn mutation_count(&self) -> usize {
        self.shared.mutations.load(Ordering::SeqCst)
    }

    /// Whether a browser is currently searching.
    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.shared.world().is_searching()
    }
}

impl Platform for VirtualPlatform {
    type HomeManager = VirtualHomeManager;
    type AccessoryBrowser = VirtualAccessoryBrowser;

    fn home_manager(&self) -> VirtualHomeManager {
        tracing::debug!("virtual home manager created");
        VirtualHomeManager {
            shared: Arc::clone(&self.shared),
        }
    }

    fn accessory_browser(&self) -> VirtualAccessoryBrowser {
        tracing::debug!("virtual accessory browser created");
        VirtualAccessoryBrowser {
            shared: Arc::clone(&self.shared),
        }
    }
}

macro_rules! impl_native_graph {
    ($ty:ty) => {
        impl NativeGraph for $ty {
            fn home(&self, id: HomeId) -> Option<NativeHome> {
                self.shared.world().home(id)
            }

            fn room(&self, id: RoomId) -> Option<NativeRoom> {
                self.shared.world().room(id)
            }

            fn zone(&self, id: ZoneId) -> Option<NativeZone> {
                self.shared.world().zone(id)
            }

            fn accessory(&self, id: AccessoryId) -> Option<NativeAccessory> {
                self.shared.world().accessory(id)
            }

            fn service(&self, id: ServiceId) -> Option<NativeService> {
                self.shared.world().service(id)
            }

            fn characteristic(&self, id: CharacteristicId) -> Option<NativeCharacteristic> {
                self.shared.world().characteristic(id)
            }
        }
    };
}

/// Home manager of a [`VirtualPlatform`].
pub struct VirtualHomeManager {
    shared: Arc<Shared>,
}

impl_native_graph!(VirtualHomeManager);

impl HomeManager for VirtualHomeManager {
    fn homes(&self) -> Vec<HomeId> {
        self.shared.world().home_ids()
    }

    /// Installing a delegate reports the current homes right away.
    fn set_delegate(&self, delegate: Arc<dyn HomeManagerDelegate>) {
        *lock(&self.shared.manager_delegate) = Some(delegate);
        self.shared.notify_homes_updated();
    }

    fn add_home(&self, name: &str) -> impl Future<Output = Result<HomeId, NativeError>> + Send {
        let result = self.shared.mutate("add_home", |world| world.add_home(name));
        async { result }
    }

    fn remove_home(&self, home: HomeId) -> impl Future<Output = Result<(), NativeError>> + Send {
        let result = self
            .shared
            .mutate("remove_home", |world| world.remove_home(home));
        async { result }
    }

    fn update_home_name(
        &self,
        home: HomeId,
        name: &str,
    ) -> impl Future<Output = Result<(), NativeError>> + Send {
        let result = self
            .shared
            .mutate("update_home_name", |world| world.rename_home(home, name));
        async { result }
    }

    fn add_zone(
        &self,
        home: HomeId,
        name: &str,
    ) -> impl Future<Output = Result<ZoneId, NativeError>> + Send {
        let result = self
            .shared
            .mutate("add_zone", |world| world.add_zone(home, name));
        async { result }
    }

    fn remove_zone(
        &self,
        home: HomeId,
        zone: ZoneId,
    ) -> impl Future<Output = Result<(), NativeError>> + Send {
        let result = self
            .shared
            .mutate("remove_zone", |world| world.remove_zone(home, zone));
        async { result }
    }

    fn update_zone_name(
        &self,
        zone: ZoneId,
        name: &str,
    ) -> impl Future<Output = Result<(), NativeError>> + Send {
        let result = self
            .shared
            .mutate("update_zone_name", |world| world.rename_zone(zone, name));
        async { result }
    }

    fn add_room(
        &self,
        home: HomeId,
        name: &str,
    ) -> impl Future<Output = Result<RoomId, NativeError>> + Send {
        let result = self
            .shared
            .mutate("add_room", |world| world.add_room(home, name));
        async { result }
    }

    fn remove_room(
        &self,
        home: HomeId,
        room: RoomId,
    ) -> impl Future<Output = Result<(), NativeError>> + Send {
        let result = self
            .shared
            .mutate("remove_room", |world| world.remove_room(home, room));
        async { result }
    }

    fn update_room_name(
        &self,
        room: RoomId,
        name: &str,
    ) -> impl Future<Output = Result<(), NativeError>> + Send {
        let result = self
            .shared
            .mutate("update_room_name", |world| world.rename_room(room, name));
        async { result }
    }

    fn add_room_to_zone(
        &self,
        zone: ZoneId,
        room: RoomId,
    ) -> impl Future<Output = Result<(), NativeError>> + Send {
        let result = self.shared.mutate("add_room_to_zone", |world| {
            world.add_room_to_zone(zone, room)
        });
        async { result }
    }

    fn remove_room_from_zone(
        &self,
        zone: ZoneId,
        room: RoomId,
    ) -> impl Future<Output = Result<(), NativeError>> + Send {
        let result = self.shared.mutate("remove_room_from_zone", |world| {
            world.remove_room_from_zone(zone, room)
        });
        async { result }
    }

    fn add_accessory(
        &self,
        home: HomeId,
        accessory: AccessoryId,
    ) -> impl Future<Output = Result<(), NativeError>> + Send {
        let result = self.shared.mutate("add_accessory", |world| {
            world.add_accessory(home, accessory)
        });
        async { result }
    }

    fn remove_accessory(
        &self,
        home: HomeId,
        accessory: AccessoryId,
    ) -> impl Future<Output = Result<(), NativeError>> + Send {
        let result = self.shared.mutate("remove_accessory", |world| {
            world.remove_accessory(home, accessory)
        });
        async { result }
    }

    fn assign_accessory_to_room(
        &self,
        home: HomeId,
        accessory: AccessoryId,
        room: RoomId,
    ) -> impl Future<Output = Result<(), NativeError>> + Send {
        let result = self.shared.mutate("assign_accessory_to_room", |world| {
            world.assign_accessory_to_room(home, accessory, room)
        });
        async { result }
    }
}

/// Accessory browser of a [`VirtualPlatform`].
pub struct VirtualAccessoryBrowser {
    shared: Arc<Shared>,
}

impl_native_graph!(VirtualAccessoryBrowser);

impl AccessoryBrowser for VirtualAccessoryBrowser {
    fn discovered_accessories(&self) -> Vec<AccessoryId> {
        self.shared.world().discovered()
    }

    fn set_delegate(&self, delegate: Arc<dyn AccessoryBrowserDelegate>) {
        *lock(&self.shared.browser_delegate) = Some(delegate);
    }

    fn start_searching(&self) {
        let discoveries = {
            let mut world = self.shared.world();
            world.start_searching();
            world.take_pending()
        };
        tracing::debug!(found = discoveries.len(), "virtual search started");
        self.shared.dispatch(discoveries);
    }

    fn stop_searching(&self) {
        self.shared.world().stop_searching();
        tracing::debug!("virtual search stopped");
    }

    fn update_accessory_name(
        &self,
        accessory: AccessoryId,
        name: &str,
    ) -> impl Future<Output = Result<(), NativeError>> + Send {
        let result = self.shared.mutate("update_accessory_name", |world| {
            world.rename_accessory(accessory, name)
        });
        async { result }
    }
}
