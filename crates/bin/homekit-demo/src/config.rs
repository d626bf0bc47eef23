//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `homekit.toml` in the working directory, or at the path in
//! `HOMEKIT_CONFIG`. Every field has a default so the file is optional.
//! Environment variables take precedence over file values.

use homekit_adapter_virtual::VirtualConfig;
use serde::Deserialize;

const DEFAULT_PATH: &str = "homekit.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Names used by the walkthrough.
    pub demo: DemoConfig,
    /// What the virtual platform starts with.
    #[serde(rename = "virtual")]
    pub virtual_platform: VirtualConfig,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Home, room and zone the walkthrough creates or reuses.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub home: String,
    pub room: String,
    pub zone: String,
}

impl Config {
    /// Load configuration from `homekit.toml` (or `HOMEKIT_CONFIG`) if
    /// present, then apply environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is malformed or invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("HOMEKIT_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("HOMEKIT_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("demo.home", &self.demo.home),
            ("demo.room", &self.demo.room),
            ("demo.zone", &self.demo.zone),
        ] {
            if value.trim().is_empty() {
                let message = format!("{field} must not be empty");
                return Err(ConfigError::Validation(message));
            }
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "homekit_demo=info,homekit_app=info,homekit_adapter_virtual=info".to_string(),
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            home: "My Home".to_string(),
            room: "Office".to_string(),
            zone: "Upstairs".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
