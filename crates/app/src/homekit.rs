//! The `HomeKit` adapter: every home, zone, room and accessory operation as
//! a uniform asynchronous call.
//!
//! Each mutating operation runs the same sequence:
//!
//! 1. readiness check (home manager created, accessory browser created)
//! 2. by-name resolution through the [`lookup`] layer
//! 3. the native mutation
//! 4. a native failure is surfaced verbatim
//! 5. on success the affected native object is transformed again and returned
//!
//! Nothing is retried, queued or deduplicated. Concurrent calls race at the
//! native layer.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use homekit_domain::accessory::Accessory;
use homekit_domain::error::{HomeKitError, NativeError, NotFoundError, PreconditionError};
use homekit_domain::home::Home;
use homekit_domain::id::{AccessoryId, HomeId, RoomId, ZoneId};
use homekit_domain::room::Room;
use homekit_domain::zone::Zone;

use crate::delegate::{AccessoryBrowserDelegateShim, HomeManagerDelegateShim};
use crate::lookup;
use crate::ports::{AccessoryBrowser, HomeManager, NativeGraph, Platform};
use crate::transform;

/// Receives the full, freshly transformed home list on every native change.
pub type HomesUpdatedCallback = Arc<dyn Fn(Vec<Home>) + Send + Sync>;

/// Receives one transformed accessory per discovery event.
pub type AccessoryCallback = Arc<dyn Fn(Accessory) + Send + Sync>;

/// Adapter over one native platform.
///
/// The home manager exists from the first successful [`init`](Self::init);
/// the accessory browser from the first successful
/// [`start_searching_for_accessories`](Self::start_searching_for_accessories).
/// Neither is torn down afterwards: stopping a search keeps the browser so
/// discovered accessories can still be looked up by name.
pub struct HomeKit<P: Platform> {
    platform: P,
    home_manager: Option<Arc<P::HomeManager>>,
    accessory_browser: Option<Arc<P::AccessoryBrowser>>,
    searching: AtomicBool,
}

impl<P: Platform> HomeKit<P> {
    /// Create an adapter. No native object is created until `init` or a search.
    pub fn new(platform: P) -> Self {
        Self {
            platform,
            home_manager: None,
            accessory_browser: None,
            searching: AtomicBool::new(false),
        }
    }

    /// Whether the platform framework is usable.
    // Kept async so every adapter operation is awaited the same way.
    #[allow(clippy::unused_async)]
    pub async fn available(&self) -> bool {
        self.platform.available()
    }

    /// Create the home manager (once) and install `on_homes_updated` as the
    /// receiver of home-list changes.
    ///
    /// Calling `init` again only rebinds the callback.
    ///
    /// # Errors
    ///
    /// Returns [`PreconditionError::MissingHomesCallback`] when no callback is given.
    #[allow(clippy::unused_async)]
    pub async fn init(
        &mut self,
        on_homes_updated: Option<HomesUpdatedCallback>,
    ) -> Result<(), HomeKitError> {
        let on_homes_updated = on_homes_updated.ok_or(PreconditionError::MissingHomesCallback)?;

        let manager = Arc::clone(
            self.home_manager
                .get_or_insert_with(|| Arc::new(self.platform.home_manager())),
        );
        let weak = Arc::downgrade(&manager);
        manager.set_delegate(Arc::new(HomeManagerDelegateShim::with_callback(move || {
            if let Some(manager) = weak.upgrade() {
                on_homes_updated(transform::homes(&*manager, &manager.homes()));
            } else {
                tracing::debug!("home manager dropped, discarding homes update");
            }
        })));

        tracing::info!("home manager ready");
        Ok(())
    }

    /// Create the accessory browser (once), install the discovery callbacks
    /// and start searching.
    ///
    /// Removal events are dropped when `on_removed` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`PreconditionError::MissingAccessoryCallback`] when `on_found` is missing.
    #[allow(clippy::unused_async)]
    pub async fn start_searching_for_accessories(
        &mut self,
        on_found: Option<AccessoryCallback>,
        on_removed: Option<AccessoryCallback>,
    ) -> Result<(), HomeKitError> {
        let on_found = on_found.ok_or(PreconditionError::MissingAccessoryCallback)?;

        let browser = Arc::clone(
            self.accessory_browser
                .get_or_insert_with(|| Arc::new(self.platform.accessory_browser())),
        );
        let weak = Arc::downgrade(&browser);
        browser.set_delegate(Arc::new(AccessoryBrowserDelegateShim::with_callback(
            move |id, removed| {
                let Some(browser) = weak.upgrade() else {
                    tracing::debug!(
                        accessory = %id,
                        removed,
                        "accessory browser dropped, discarding event"
                    );
                    return;
                };
                let Some(native) = browser.accessory(id) else {
                    tracing::debug!(
                        accessory = %id,
                        removed,
                        "accessory no longer known, skipping event"
                    );
                    return;
                };
                let accessory = transform::accessory(&*browser, &native);
                if removed {
                    if let Some(on_removed) = &on_removed {
                        on_removed(accessory);
                    }
                } else {
                    on_found(accessory);
                }
            },
        )));

        browser.start_searching();
        self.searching.store(true, Ordering::SeqCst);
        tracing::info!("searching for accessories");
        Ok(())
    }

    /// Halt discovery. The browser is kept for later name lookups.
    #[allow(clippy::unused_async)]
    pub async fn stop_searching_for_accessories(&self) {
        if let Some(browser) = &self.accessory_browser {
            browser.stop_searching();
            self.searching.store(false, Ordering::SeqCst);
            tracing::info!("stopped searching for accessories");
        }
    }

    /// Whether a search is currently running.
    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.searching.load(Ordering::SeqCst)
    }

    /// Current homes, freshly transformed.
    ///
    /// # Errors
    ///
    /// Returns [`PreconditionError::NotInitialized`] before `init`.
    #[allow(clippy::unused_async)]
    pub async fn homes(&self) -> Result<Vec<Home>, HomeKitError> {
        let manager = self.manager()?;
        Ok(transform::homes(manager, &manager.homes()))
    }

    // -- homes

    /// # Errors
    ///
    /// Fails before `init`, or with the native error.
    pub async fn add_home(&self, name: &str) -> Result<Home, HomeKitError> {
        let manager = self.manager()?;
        tracing::debug!(home = name, "adding home");
        let id = manager
            .add_home(name)
            .await
            .map_err(|err| native_failure("add_home", err))?;
        reload_home(manager, id, name)
    }

    /// Resolves with the home as it was just before removal.
    ///
    /// # Errors
    ///
    /// Fails before `init`, when no home has that name, or with the native error.
    pub async fn remove_home(&self, name: &str) -> Result<Home, HomeKitError> {
        let manager = self.manager()?;
        let home = lookup::find_home(manager, name).ok_or_else(|| NotFoundError::home(name))?;
        let snapshot = transform::home(manager, &home);
        tracing::debug!(home = name, "removing home");
        manager
            .remove_home(home.id)
            .await
            .map_err(|err| native_failure("remove_home", err))?;
        Ok(snapshot)
    }

    /// # Errors
    ///
    /// Fails before `init`, when no home has `old_name`, or with the native error.
    pub async fn rename_home(&self, old_name: &str, new_name: &str) -> Result<Home, HomeKitError> {
        let manager = self.manager()?;
        let home =
            lookup::find_home(manager, old_name).ok_or_else(|| NotFoundError::home(old_name))?;
        tracing::debug!(from = old_name, to = new_name, "renaming home");
        manager
            .update_home_name(home.id, new_name)
            .await
            .map_err(|err| native_failure("update_home_name", err))?;
        reload_home(manager, home.id, new_name)
    }

    // -- zones

    /// # Errors
    ///
    /// Fails before `init`, when the home is unknown, or with the native error.
    pub async fn add_zone(&self, name: &str, to_home: &str) -> Result<Zone, HomeKitError> {
        let manager = self.manager()?;
        let home = lookup::find_home(manager, to_home).ok_or_else(|| NotFoundError::home(to_home))?;
        tracing::debug!(zone = name, home = to_home, "adding zone");
        let id = manager
            .add_zone(home.id, name)
            .await
            .map_err(|err| native_failure("add_zone", err))?;
        reload_zone(manager, id, name)
    }

    /// Resolves with the zone as it was just before removal.
    ///
    /// # Errors
    ///
    /// Fails before `init`, when the home or zone is unknown, or with the native error.
    pub async fn remove_zone(&self, name: &str, from_home: &str) -> Result<Zone, HomeKitError> {
        let manager = self.manager()?;
        let home =
            lookup::find_home(manager, from_home).ok_or_else(|| NotFoundError::home(from_home))?;
        let zone =
            lookup::find_zone(manager, name, &home).ok_or_else(|| NotFoundError::zone(name))?;
        let snapshot = transform::zone(manager, &zone);
        tracing::debug!(zone = name, home = from_home, "removing zone");
        manager
            .remove_zone(home.id, zone.id)
            .await
            .map_err(|err| native_failure("remove_zone", err))?;
        Ok(snapshot)
    }

    /// # Errors
    ///
    /// Fails before `init`, when the home or zone is unknown, or with the native error.
    pub async fn rename_zone(
        &self,
        old_name: &str,
        new_name: &str,
        in_home: &str,
    ) -> Result<Zone, HomeKitError> {
        let manager = self.manager()?;
        let home = lookup::find_home(manager, in_home).ok_or_else(|| NotFoundError::home(in_home))?;
        let zone = lookup::find_zone(manager, old_name, &home)
            .ok_or_else(|| NotFoundError::zone(old_name))?;
        tracing::debug!(
            from = old_name,
            to = new_name,
            home = in_home,
            "renaming zone"
        );
        manager
            .update_zone_name(zone.id, new_name)
            .await
            .map_err(|err| native_failure("update_zone_name", err))?;
        reload_zone(manager, zone.id, new_name)
    }

    /// # Errors
    ///
    /// Fails before `init`, when the home, room or zone is unknown, or with
    /// the native error.
    pub async fn add_room_to_zone(
        &self,
        room_name: &str,
        to_zone: &str,
        in_home: &str,
    ) -> Result<Zone, HomeKitError> {
        let manager = self.manager()?;
        let home = lookup::find_home(manager, in_home).ok_or_else(|| NotFoundError::home(in_home))?;
        let room = lookup::find_room(manager, room_name, &home)
            .ok_or_else(|| NotFoundError::room(room_name))?;
        let zone =
            lookup::find_zone(manager, to_zone, &home).ok_or_else(|| NotFoundError::zone(to_zone))?;
        tracing::debug!(
            room = room_name,
            zone = to_zone,
            home = in_home,
            "adding room to zone"
        );
        manager
            .add_room_to_zone(zone.id, room.id)
            .await
            .map_err(|err| native_failure("add_room_to_zone", err))?;
        reload_zone(manager, zone.id, to_zone)
    }

    /// # Errors
    ///
    /// Fails before `init`, when the home, room or zone is unknown, or with
    /// the native error.
    pub async fn remove_room_from_zone(
        &self,
        room_name: &str,
        from_zone: &str,
        in_home: &str,
    ) -> Result<Zone, HomeKitError> {
        let manager = self.manager()?;
        let home = lookup::find_home(manager, in_home).ok_or_else(|| NotFoundError::home(in_home))?;
        let room = lookup::find_room(manager, room_name, &home)
            .ok_or_else(|| NotFoundError::room(room_name))?;
        let zone = lookup::find_zone(manager, from_zone, &home)
            .ok_or_else(|| NotFoundError::zone(from_zone))?;
        tracing::debug!(
            room = room_name,
            zone = from_zone,
            home = in_home,
            "removing room from zone"
        );
        manager
            .remove_room_from_zone(zone.id, room.id)
            .await
            .map_err(|err| native_failure("remove_room_from_zone", err))?;
        reload_zone(manager, zone.id, from_zone)
    }

    // -- rooms

    /// # Errors
    ///
    /// Fails before `init`, when the home is unknown, or with the native error.
    pub async fn add_room_to_home(&self, name: &str, to_home: &str) -> Result<Room, HomeKitError> {
        let manager = self.manager()?;
        let home = lookup::find_home(manager, to_home).ok_or_else(|| NotFoundError::home(to_home))?;
        tracing::debug!(room = name, home = to_home, "adding room");
        let id = manager
            .add_room(home.id, name)
            .await
            .map_err(|err| native_failure("add_room", err))?;
        reload_room(manager, id, name)
    }

    /// Resolves with the room as it was just before removal.
    ///
    /// # Errors
    ///
    /// Fails before `init`, when the home or room is unknown, or with the native error.
    pub async fn remove_room_from_home(
        &self,
        name: &str,
        from_home: &str,
    ) -> Result<Room, HomeKitError> {
        let manager = self.manager()?;
        let home =
            lookup::find_home(manager, from_home).ok_or_else(|| NotFoundError::home(from_home))?;
        let room =
            lookup::find_room(manager, name, &home).ok_or_else(|| NotFoundError::room(name))?;
        let snapshot = transform::room(manager, &room, false);
        tracing::debug!(room = name, home = from_home, "removing room");
        manager
            .remove_room(home.id, room.id)
            .await
            .map_err(|err| native_failure("remove_room", err))?;
        Ok(snapshot)
    }

    /// # Errors
    ///
    /// Fails before `init`, when the home or room is unknown, or with the native error.
    pub async fn rename_room(
        &self,
        old_name: &str,
        new_name: &str,
        in_home: &str,
    ) -> Result<Room, HomeKitError> {
        let manager = self.manager()?;
        let home = lookup::find_home(manager, in_home).ok_or_else(|| NotFoundError::home(in_home))?;
        let room = lookup::find_room(manager, old_name, &home)
            .ok_or_else(|| NotFoundError::room(old_name))?;
        tracing::debug!(
            from = old_name,
            to = new_name,
            home = in_home,
            "renaming room"
        );
        manager
            .update_room_name(room.id, new_name)
            .await
            .map_err(|err| native_failure("update_room_name", err))?;
        reload_room(manager, room.id, new_name)
    }

    // -- accessories

    /// Add a discovered accessory to a home.
    ///
    /// # Errors
    ///
    /// Fails before `init`, before any search, when the home or discovered
    /// accessory is unknown, or with the native error.
    pub async fn add_accessory_to_home(
        &self,
        accessory_name: &str,
        to_home: &str,
    ) -> Result<Home, HomeKitError> {
        let manager = self.manager()?;
        let browser = self.browser()?;
        let home = lookup::find_home(manager, to_home).ok_or_else(|| NotFoundError::home(to_home))?;
        let accessory = lookup::find_accessory(browser, accessory_name)
            .ok_or_else(|| NotFoundError::accessory(accessory_name))?;
        tracing::debug!(
            accessory = accessory_name,
            home = to_home,
            "adding accessory to home"
        );
        manager
            .add_accessory(home.id, accessory.id)
            .await
            .map_err(|err| native_failure("add_accessory", err))?;
        reload_home(manager, home.id, to_home)
    }

    /// # Errors
    ///
    /// Fails before `init`, when the home or one of its accessories is
    /// unknown, or with the native error.
    pub async fn remove_accessory_from_home(
        &self,
        accessory_name: &str,
        from_home: &str,
    ) -> Result<Home, HomeKitError> {
        let manager = self.manager()?;
        let home =
            lookup::find_home(manager, from_home).ok_or_else(|| NotFoundError::home(from_home))?;
        let accessory = lookup::find_accessory_in_home(manager, accessory_name, &home)
            .ok_or_else(|| NotFoundError::accessory(accessory_name))?;
        tracing::debug!(
            accessory = accessory_name,
            home = from_home,
            "removing accessory from home"
        );
        manager
            .remove_accessory(home.id, accessory.id)
            .await
            .map_err(|err| native_failure("remove_accessory", err))?;
        reload_home(manager, home.id, from_home)
    }

    /// Move an accessory of a home into one of its rooms.
    ///
    /// Moving an accessory changes two rooms, so every room of the home is
    /// returned. Resolves with `None`, without touching the native layer,
    /// when the accessory already is in that room.
    ///
    /// # Errors
    ///
    /// Fails before `init`, when the home, room or accessory is unknown, or
    /// with the native error.
    pub async fn assign_accessory_to_room(
        &self,
        accessory_name: &str,
        room_name: &str,
        home_name: &str,
    ) -> Result<Option<Vec<Room>>, HomeKitError> {
        let manager = self.manager()?;
        let home =
            lookup::find_home(manager, home_name).ok_or_else(|| NotFoundError::home(home_name))?;
        let room = lookup::find_room(manager, room_name, &home)
            .ok_or_else(|| NotFoundError::room(room_name).in_home(home_name))?;
        let missing = || NotFoundError::accessory(accessory_name).in_home(home_name);
        let accessory =
            lookup::find_accessory_in_home(manager, accessory_name, &home).ok_or_else(missing)?;

        if accessory.room == Some(room.id) {
            tracing::debug!(
                accessory = accessory_name,
                room = room_name,
                "accessory already in room"
            );
            return Ok(None);
        }

        tracing::debug!(
            accessory = accessory_name,
            room = room_name,
            home = home_name,
            "assigning accessory to room"
        );
        manager
            .assign_accessory_to_room(home.id, accessory.id, room.id)
            .await
            .map_err(|err| native_failure("assign_accessory_to_room", err))?;

        let home = manager
            .home(home.id)
            .ok_or_else(|| NotFoundError::home(home_name))?;
        Ok(Some(transform::rooms(manager, &home.rooms)))
    }

    /// Rename a discovered accessory.
    ///
    /// # Errors
    ///
    /// Fails before any search, when no discovered accessory has `old_name`,
    /// or with the native error.
    pub async fn rename_accessory(
        &self,
        old_name: &str,
        new_name: &str,
    ) -> Result<Accessory, HomeKitError> {
        let browser = self.browser()?;
        let accessory = lookup::find_accessory(browser, old_name)
            .ok_or_else(|| NotFoundError::accessory(old_name))?;
        tracing::debug!(from = old_name, to = new_name, "renaming accessory");
        browser
            .update_accessory_name(accessory.id, new_name)
            .await
            .map_err(|err| native_failure("update_accessory_name", err))?;
        reload_accessory(browser, accessory.id, new_name)
    }

    fn manager(&self) -> Result<&P::HomeManager, PreconditionError> {
        self.home_manager
            .as_deref()
            .ok_or(PreconditionError::NotInitialized)
    }

    fn browser(&self) -> Result<&P::AccessoryBrowser, PreconditionError> {
        self.accessory_browser
            .as_deref()
            .ok_or(PreconditionError::BrowserNotStarted)
    }
}

fn native_failure(operation: &'static str, err: NativeError) -> HomeKitError {
    tracing::warn!(operation, error = %err, "native operation failed");
    err.into()
}

fn reload_home<G: NativeGraph + ?Sized>(
    graph: &G,
    id: HomeId,
    name: &str,
) -> Result<Home, HomeKitError> {
    let native = graph.home(id).ok_or_else(|| NotFoundError::home(name))?;
    Ok(transform::home(graph, &native))
}

fn reload_zone<G: NativeGraph + ?Sized>(
    graph: &G,
    id: ZoneId,
    name: &str,
) -> Result<Zone, HomeKitError> {
    let native = graph.zone(id).ok_or_else(|| NotFoundError::zone(name))?;
    Ok(transform::zone(graph, &native))
}

fn reload_room<G: NativeGraph + ?Sized>(
    graph: &G,
    id: RoomId,
    name: &str,
) -> Result<Room, HomeKitError> {
    let native = graph.room(id).ok_or_else(|| NotFoundError::room(name))?;
    Ok(transform::room(graph, &native, false))
}

fn reload_accessory<G: NativeGraph + ?Sized>(
    graph: &G,
    id: AccessoryId,
    name: &str,
) -> Result<Accessory, HomeKitError> {
    let native = graph.accessory(id).ok_or_else(|| NotFoundError::accessory(name))?;
    Ok(transform::accessory(graph, &native))
}
