//! # homekit-domain
//!
//! Plain value model for the homekit binding.
//!
//! ## Responsibilities
//! - Foundational types: typed native handles, error conventions
//! - Define **Homes** (top-level containers of rooms, zones and accessories)
//! - Define **Rooms** and **Zones** (named spaces and groupings of spaces)
//! - Define **Accessories** (controllable devices, optionally bridged)
//! - Define **Services** and **Characteristics** (capabilities and their properties)
//!
//! Every record is an immutable snapshot of native state taken at transform
//! time. Records are never cached or merged; callers replace them wholesale.
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.

pub mod error;
pub mod id;

pub mod accessory;
pub mod home;
pub mod room;
pub mod service;
pub mod zone;
