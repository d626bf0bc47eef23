//! # homekit-app
//!
//! Adapter layer: the uniform asynchronous API and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** the native framework binding must implement:
//!   - `NativeGraph`: resolve native handles to node views
//!   - `HomeManager`: the home list and every home/zone/room mutation
//!   - `AccessoryBrowser`: accessory discovery
//!   - `Platform`: factory for the two native singletons
//! - Map native nodes to plain value records (`transform`)
//! - Resolve names to native handles (`lookup`)
//! - Turn native delegate callbacks into user callbacks (`delegate`)
//! - Expose every operation through [`HomeKit`](homekit::HomeKit)
//!
//! ## Dependency rule
//! Depends on `homekit-domain` only (plus `tokio::sync` for event streams).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod delegate;
pub mod homekit;
pub mod lookup;
pub mod ports;
pub mod subscription;
pub mod transform;

pub use homekit::{AccessoryCallback, HomeKit, HomesUpdatedCallback};
