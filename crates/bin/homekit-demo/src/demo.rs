//! The pairing walkthrough the binary runs.

use std::sync::Arc;

use homekit_app::HomeKit;
use homekit_app::ports::Platform;
use homekit_app::subscription::AccessoryEvent;
use homekit_domain::error::HomeKitError;
use homekit_domain::home::Home;

use crate::config::DemoConfig;

/// Make sure the configured home, room and zone exist, pair the first
/// discovered accessory into the room and return the resulting homes.
///
/// Steps that are already satisfied are skipped, so running the walkthrough
/// twice against the same platform is harmless.
///
/// # Errors
///
/// Fails with the first error reported by the adapter.
pub async fn run<P: Platform>(platform: P, demo: &DemoConfig) -> Result<Vec<Home>, HomeKitError> {
    let mut homekit = HomeKit::new(platform);
    if !homekit.available().await {
        tracing::warn!("home automation framework unavailable");
        return Ok(Vec::new());
    }

    homekit
        .init(Some(Arc::new(|homes: Vec<Home>| {
            tracing::info!(count = homes.len(), "homes updated");
        })))
        .await?;
    let mut events = homekit.watch_accessories().await?.into_inner();

    let homes = homekit.homes().await?;
    let home = match homes.into_iter().find(|home| home.name == demo.home) {
        Some(home) => home,
        None => homekit.add_home(&demo.home).await?,
    };
    if home.room(&demo.room).is_none() {
        homekit.add_room_to_home(&demo.room, &demo.home).await?;
    }
    let zone = match home.zone(&demo.zone) {
        Some(zone) => zone.clone(),
        None => homekit.add_zone(&demo.zone, &demo.home).await?,
    };
    if !zone.contains_room(&demo.room) {
        homekit
            .add_room_to_zone(&demo.room, &demo.zone, &demo.home)
            .await?;
    }

    let mut found = None;
    while let Ok(event) = events.try_recv() {
        if let AccessoryEvent::Found(accessory) = event {
            tracing::info!(
                accessory = %accessory.name,
                bridged = accessory.bridged,
                "accessory found"
            );
            found.get_or_insert(accessory);
        }
    }
    match found {
        Some(accessory) => {
            homekit
                .add_accessory_to_home(&accessory.name, &demo.home)
                .await?;
            homekit
                .assign_accessory_to_room(&accessory.name, &demo.room, &demo.home)
                .await?;
            tracing::info!(accessory = %accessory.name, room = %demo.room, "accessory paired");
        }
        None => tracing::warn!("no accessory discovered, nothing to pair"),
    }

    homekit.stop_searching_for_accessories().await;
    homekit.homes().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use homekit_adapter_virtual::{SeedAccessory, VirtualConfig, VirtualPlatform};

    fn demo() -> DemoConfig {
        DemoConfig {
            home: "Cabin".to_string(),
            room: "Den".to_string(),
            zone: "Ground Floor".to_string(),
        }
    }

    #[tokio::test]
    async fn should_create_home_and_pair_first_accessory() {
        let platform = VirtualPlatform::from_config(&VirtualConfig {
            homes: Vec::new(),
            accessories: vec![
                SeedAccessory::with_service("Plug", "public.hap.service.outlet"),
                SeedAccessory::with_service("Fan", "public.hap.service.fan"),
            ],
        })
        .unwrap();

        let homes = run(platform.clone(), &demo()).await.unwrap();

        assert_eq!(homes.len(), 1);
        let cabin = &homes[0];
        assert!(cabin.primary);
        assert!(cabin.zone("Ground Floor").unwrap().contains_room("Den"));
        assert!(cabin.room("Den").unwrap().contains_accessory("Plug"));
        assert_eq!(cabin.accessory("Plug").unwrap().room_name(), Some("Den"));
        assert!(cabin.accessory("Fan").is_none());
        assert!(!platform.is_searching());
    }

    #[tokio::test]
    async fn should_reuse_existing_home_room_and_zone() {
        let plug = SeedAccessory::with_service("Plug", "public.hap.service.outlet");
        let platform = VirtualPlatform::from_config(&VirtualConfig {
            homes: Vec::new(),
            accessories: vec![plug],
        })
        .unwrap();

        run(platform.clone(), &demo()).await.unwrap();
        let mutations = platform.mutation_count();
        let homes = run(platform.clone(), &demo()).await.unwrap();

        assert_eq!(platform.mutation_count(), mutations);
        assert_eq!(homes.len(), 1);
        assert_eq!(homes[0].rooms.len(), 1);
    }

    #[tokio::test]
    async fn should_skip_pairing_when_nothing_is_in_range() {
        let platform = VirtualPlatform::from_config(&VirtualConfig {
            homes: Vec::new(),
            accessories: Vec::new(),
        })
        .unwrap();

        let homes = run(platform, &demo()).await.unwrap();

        assert!(homes[0].accessories.is_empty());
        let den = homes[0].room("Den").unwrap();
        assert!(den.accessories.as_ref().is_none_or(Vec::is_empty));
    }
}
