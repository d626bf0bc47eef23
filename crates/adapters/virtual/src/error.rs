//! Virtual platform errors and the native failure descriptions it reports.

use homekit_domain::error::NativeError;

pub(crate) const INVALID_NAME: &str = "The specified name is invalid.";
pub(crate) const NAME_IN_USE: &str = "Name already in use.";
pub(crate) const OBJECT_NOT_FOUND: &str = "Object not found.";
pub(crate) const ALREADY_ASSOCIATED: &str = "Object is already associated.";
pub(crate) const ACCESSORY_ALREADY_ADDED: &str = "Accessory is already added to a home.";

pub(crate) fn native(description: &str) -> NativeError {
    NativeError::new(description)
}

/// Errors raised while seeding the virtual platform from configuration.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// A zone or accessory refers to a room its home does not have.
    #[error("home '{home}' has no room named '{room}'")]
    UnknownRoom {
        /// Home being seeded.
        home: String,
        /// Room name that could not be resolved.
        room: String,
    },

    /// The native layer rejected a seeded object (invalid or duplicate name).
    #[error("failed to seed '{name}'")]
    Rejected {
        /// Name of the object being seeded.
        name: String,
        #[source]
        source: NativeError,
    },
}
