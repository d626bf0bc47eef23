//! # homekit-demo
//!
//! Composition root that wires the `HomeKit` adapter to the virtual platform
//! and runs a pairing walkthrough.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Install the tracing subscriber
//! - Seed the virtual platform
//! - Run the walkthrough and print the resulting homes as JSON
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no adapter logic belongs here.

mod config;
mod demo;

use homekit_adapter_virtual::VirtualPlatform;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .with_target(false)
        .compact()
        .init();

    let platform = VirtualPlatform::from_config(&config.virtual_platform)?;
    let homes = demo::run(platform, &config.demo).await?;

    println!("{}", serde_json::to_string_pretty(&homes)?);
    Ok(())
}
