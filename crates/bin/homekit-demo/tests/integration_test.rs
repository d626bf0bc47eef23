//! End-to-end tests for the `HomeKit` adapter on the virtual platform.
//!
//! Each test seeds a fresh [`VirtualPlatform`] and drives it through the
//! public adapter API only; the platform's own hooks are used to inject
//! failures and count native mutations.

use std::sync::{Arc, Mutex};

use homekit_adapter_virtual::{
    SeedAccessory, SeedHome, SeedZone, VirtualConfig, VirtualPlatform,
};
use homekit_app::subscription::AccessoryEvent;
use homekit_app::{AccessoryCallback, HomeKit, HomesUpdatedCallback};
use homekit_domain::accessory::Accessory;
use homekit_domain::home::Home;
use tokio_stream::StreamExt;

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

fn platform(homes: Vec<SeedHome>, in_range: Vec<SeedAccessory>) -> VirtualPlatform {
    VirtualPlatform::from_config(&VirtualConfig {
        homes,
        accessories: in_range,
    })
    .expect("seed should be valid")
}

fn plug() -> SeedAccessory {
    SeedAccessory::with_service("Plug", "public.hap.service.outlet")
}

fn recorder<T: Send + 'static>() -> (Arc<Mutex<Vec<T>>>, Arc<dyn Fn(T) + Send + Sync>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    (seen, Arc::new(move |value: T| sink.lock().unwrap().push(value)))
}

fn home_names(homes: &[Home]) -> Vec<&str> {
    homes.iter().map(|home| home.name.as_str()).collect()
}

async fn ready(platform: &VirtualPlatform) -> HomeKit<VirtualPlatform> {
    let mut homekit = HomeKit::new(platform.clone());
    let noop: HomesUpdatedCallback = Arc::new(|_: Vec<Home>| {});
    homekit.init(Some(noop)).await.unwrap();
    homekit
}

async fn searching(platform: &VirtualPlatform) -> HomeKit<VirtualPlatform> {
    let mut homekit = ready(platform).await;
    let noop: AccessoryCallback = Arc::new(|_: Accessory| {});
    homekit
        .start_searching_for_accessories(Some(noop), None)
        .await
        .unwrap();
    homekit
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_report_platform_available() {
    let homekit = HomeKit::new(VirtualPlatform::default());
    assert!(homekit.available().await);
}

#[tokio::test]
async fn should_deliver_both_homes_once_when_init_registers() {
    let loft = SeedHome {
        name: "Loft".to_string(),
        ..SeedHome::default()
    };
    let platform = platform(vec![cabin(), loft], Vec::new());
    let mut homekit = HomeKit::new(platform);
    let (seen, callback) = recorder::<Vec<Home>>();

    homekit.init(Some(callback)).await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(home_names(&seen[0]), vec!["Cabin", "Loft"]);
    assert!(seen[0][0].primary);
    assert!(!seen[0][1].primary);
}

#[tokio::test]
async fn should_reject_every_home_operation_before_init() {
    let homekit = HomeKit::new(platform(vec![cabin()], Vec::new()));

    let errors = [
        homekit.homes().await.unwrap_err(),
        homekit.add_home("Office").await.unwrap_err(),
        homekit.remove_home("Cabin").await.unwrap_err(),
        homekit.rename_home("Cabin", "Lodge").await.unwrap_err(),
        homekit.add_zone("Upstairs", "Cabin").await.unwrap_err(),
        homekit
            .add_room_to_home("Attic", "Cabin")
            .await
            .unwrap_err(),
        homekit
            .add_room_to_zone("Den", "Downstairs", "Cabin")
            .await
            .unwrap_err(),
        homekit
            .assign_accessory_to_room("Kettle", "Den", "Cabin")
            .await
            .unwrap_err(),
        homekit
            .remove_accessory_from_home("Kettle", "Cabin")
            .await
            .unwrap_err(),
    ];
    for err in errors {
        assert_eq!(err.to_string(), "Run 'init' first");
    }
}

#[tokio::test]
async fn should_reject_init_and_search_without_callbacks() {
    let mut homekit = HomeKit::new(VirtualPlatform::default());

    let err = homekit.init(None).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Pass in a function that will receive the discovered homes"
    );
    let err = homekit
        .start_searching_for_accessories(None, None)
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Pass in a function that will receive newly found accessories"
    );
}

#[tokio::test]
async fn should_require_search_before_pairing_even_after_init() {
    let platform = platform(vec![cabin()], vec![plug()]);
    let homekit = ready(&platform).await;

    let err = homekit
        .add_accessory_to_home("Plug", "Cabin")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Please search for accessories first");
    let err = homekit
        .rename_accessory("Plug", "Socket")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Please search for accessories first");
    assert_eq!(platform.mutation_count(), 0);
}

// ---------------------------------------------------------------------------
// Homes, zones and rooms
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_add_then_remove_home_and_drop_it_from_updates() {
    let platform = platform(vec![cabin()], Vec::new());
    let mut homekit = HomeKit::new(platform);
    let (seen, callback) = recorder::<Vec<Home>>();
    homekit.init(Some(callback)).await.unwrap();

    let office = homekit.add_home("Office").await.unwrap();
    assert_eq!(office.name, "Office");
    assert!(!office.primary);

    let removed = homekit.remove_home("Office").await.unwrap();
    assert_eq!(removed.name, "Office");

    let seen = seen.lock().unwrap();
    assert_eq!(home_names(&seen[1]), vec!["Cabin", "Office"]);
    assert_eq!(home_names(seen.last().unwrap()), vec!["Cabin"]);
}

#[tokio::test]
async fn should_surface_native_errors_verbatim() {
    let platform = platform(vec![cabin()], Vec::new());
    let homekit = ready(&platform).await;

    let err = homekit.add_home("Cabin").await.unwrap_err();
    assert_eq!(err.to_string(), "Name already in use.");
    let err = homekit.add_room_to_home("", "Cabin").await.unwrap_err();
    assert_eq!(err.to_string(), "The specified name is invalid.");

    platform.fail_next("The operation couldn't be completed.");
    let err = homekit.rename_home("Cabin", "Lodge").await.unwrap_err();
    assert_eq!(err.to_string(), "The operation couldn't be completed.");
    assert_eq!(homekit.homes().await.unwrap()[0].name, "Cabin");
}

#[tokio::test]
async fn should_name_the_queried_object_when_lookup_fails() {
    let platform = platform(vec![cabin()], Vec::new());
    let homekit = ready(&platform).await;

    let err = homekit.remove_home("Villa").await.unwrap_err();
    assert_eq!(err.to_string(), "No home found for name 'Villa'");
    let err = homekit.remove_zone("Attic", "Cabin").await.unwrap_err();
    assert!(err.to_string().contains("'Attic'"));
    let err = homekit
        .rename_room("Garage", "Shed", "Cabin")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("'Garage'"));
    let err = homekit
        .assign_accessory_to_room("Toaster", "Den", "Cabin")
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "No accessory found for name 'Toaster' in home with name 'Cabin'"
    );
    assert_eq!(platform.mutation_count(), 0);
}

#[tokio::test]
async fn should_manage_zone_membership() {
    let platform = platform(vec![cabin()], Vec::new());
    let homekit = ready(&platform).await;

    let zone = homekit
        .add_room_to_zone("Den", "Downstairs", "Cabin")
        .await
        .unwrap();
    assert!(zone.contains_room("Kitchen"));
    assert!(zone.contains_room("Den"));

    let zone = homekit
        .remove_room_from_zone("Kitchen", "Downstairs", "Cabin")
        .await
        .unwrap();
    assert!(!zone.contains_room("Kitchen"));

    let renamed = homekit
        .rename_zone("Downstairs", "Ground Floor", "Cabin")
        .await
        .unwrap();
    assert_eq!(renamed.name, "Ground Floor");

    let removed = homekit.remove_zone("Ground Floor", "Cabin").await.unwrap();
    assert_eq!(removed.name, "Ground Floor");
    assert!(homekit.homes().await.unwrap()[0].zones.is_empty());
}

#[tokio::test]
async fn should_unassign_accessories_when_their_room_is_removed() {
    let platform = platform(vec![cabin()], Vec::new());
    let homekit = ready(&platform).await;

    let kitchen = homekit
        .remove_room_from_home("Kitchen", "Cabin")
        .await
        .unwrap();
    assert_eq!(kitchen.name, "Kitchen");

    let homes = homekit.homes().await.unwrap();
    let cabin = &homes[0];
    assert!(cabin.room("Kitchen").is_none());
    assert!(!cabin.zone("Downstairs").unwrap().contains_room("Kitchen"));
    assert_eq!(cabin.accessory("Kettle").unwrap().room_name(), None);
}

// ---------------------------------------------------------------------------
// Accessories
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_pair_discovered_accessory_and_stop_reporting_it() {
    let platform = platform(vec![cabin()], vec![plug()]);
    let mut homekit = ready(&platform).await;
    let (found, on_found) = recorder::<Accessory>();
    let (removed, on_removed) = recorder::<Accessory>();
    homekit
        .start_searching_for_accessories(Some(on_found), Some(on_removed))
        .await
        .unwrap();
    assert_eq!(found.lock().unwrap()[0].name, "Plug");

    let cabin = homekit
        .add_accessory_to_home("Plug", "Cabin")
        .await
        .unwrap();

    assert!(cabin.accessory("Plug").is_some());
    assert_eq!(removed.lock().unwrap()[0].name, "Plug");
    let err = homekit
        .add_accessory_to_home("Plug", "Cabin")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "No accessory found for name 'Plug'");
}

#[tokio::test]
async fn should_return_every_room_when_moving_accessory() {
    let platform = platform(vec![cabin()], Vec::new());
    let homekit = ready(&platform).await;

    let rooms = homekit
        .assign_accessory_to_room("Kettle", "Den", "Cabin")
        .await
        .unwrap()
        .expect("accessory moved");

    assert_eq!(rooms.len(), 2);
    let kitchen = rooms.iter().find(|room| room.name == "Kitchen").unwrap();
    let den = rooms.iter().find(|room| room.name == "Den").unwrap();
    assert!(!kitchen.contains_accessory("Kettle"));
    assert!(den.contains_accessory("Kettle"));

    let kettle = &den.accessories.as_ref().unwrap()[0];
    let room = kettle.room.as_ref().unwrap();
    assert_eq!(room.name, "Den");
    assert!(room.accessories.is_none());
}

#[tokio::test]
async fn should_not_touch_native_layer_when_accessory_already_in_room() {
    let platform = platform(vec![cabin()], Vec::new());
    let homekit = ready(&platform).await;

    let result = homekit
        .assign_accessory_to_room("Kettle", "Kitchen", "Cabin")
        .await
        .unwrap();

    assert!(result.is_none());
    assert_eq!(platform.mutation_count(), 0);
}

#[tokio::test]
async fn should_rename_accessory_after_search_stopped() {
    let platform = platform(Vec::new(), vec![plug()]);
    let homekit = searching(&platform).await;
    homekit.stop_searching_for_accessories().await;
    assert!(!homekit.is_searching());
    assert!(!platform.is_searching());

    let socket = homekit.rename_accessory("Plug", "Socket").await.unwrap();

    assert_eq!(socket.name, "Socket");
}

#[tokio::test]
async fn should_rediscover_accessory_removed_from_home() {
    let platform = platform(vec![cabin()], Vec::new());
    let mut homekit = ready(&platform).await;
    let mut events = homekit.watch_accessories().await.unwrap();

    let cabin = homekit
        .remove_accessory_from_home("Kettle", "Cabin")
        .await
        .unwrap();
    assert!(cabin.accessory("Kettle").is_none());

    let event = events.next().await.unwrap();
    assert!(matches!(event, AccessoryEvent::Found(_)));
    assert_eq!(event.accessory().name, "Kettle");
    assert!(event.accessory().room.is_none());
}

#[tokio::test]
async fn should_stream_announced_and_withdrawn_accessories() {
    let platform = VirtualPlatform::default();
    let mut homekit = ready(&platform).await;
    let mut events = homekit.watch_accessories().await.unwrap();

    platform.announce(&plug()).unwrap();
    platform.withdraw("Plug");

    let found = events.next().await.unwrap();
    let removed = events.next().await.unwrap();
    assert!(matches!(found, AccessoryEvent::Found(_)));
    assert_eq!(found.accessory().name, "Plug");
    assert_eq!(removed.accessory().handle, found.accessory().handle);
    assert!(matches!(removed, AccessoryEvent::Removed(_)));
}

#[tokio::test]
async fn should_keep_accessory_names_unique_while_searching() {
    let fan = SeedAccessory::with_service("Fan", "public.hap.service.fan");
    let platform = platform(vec![cabin()], vec![plug(), fan]);
    let homekit = searching(&platform).await;

    let err = homekit.rename_accessory("Fan", "Plug").await.unwrap_err();
    assert_eq!(err.to_string(), "Name already in use.");
    let err = platform.announce(&plug()).unwrap_err();
    assert_eq!(err.to_string(), "Name already in use.");

    let cabin = homekit
        .add_accessory_to_home("Plug", "Cabin")
        .await
        .unwrap();
    assert!(cabin.accessory("Plug").is_some());
    assert!(cabin.accessory("Fan").is_none());
    let renamed = homekit.rename_accessory("Fan", "Kettle").await.unwrap();
    assert_eq!(renamed.name, "Kettle");
    let err = homekit
        .add_accessory_to_home("Kettle", "Cabin")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Name already in use.");
}

#[tokio::test]
async fn should_hide_unnamed_services_of_discovered_accessories() {
    let platform = VirtualPlatform::from_config(&VirtualConfig::default()).unwrap();
    let mut homekit = ready(&platform).await;
    let mut events = homekit.watch_accessories().await.unwrap();

    let lamp = events.next().await.unwrap();
    let lamp = lamp.accessory();

    assert_eq!(lamp.name, "Desk Lamp");
    assert_eq!(lamp.services.len(), 1);
    let service = lamp.service("Desk Lamp").unwrap();
    assert!(
        service
            .characteristic("public.hap.characteristic.brightness")
            .is_some()
    );
}
