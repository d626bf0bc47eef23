//! Typed native handles backed by UUIDs.
//!
//! A handle is the only way a value record points back at the native object
//! it was produced from. The native layer resolves handles; records never
//! hold references to each other.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! native_handle {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Mint a fresh random handle.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            #[must_use]
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            #[must_use]
            pub fn as_uuid(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<$name> for Uuid {
            fn from(handle: $name) -> Self {
                handle.0
            }
        }

        // `HomeId(<uuid>)`
        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0.hyphenated())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0.hyphenated(), f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self)
            }
        }
    };
}

native_handle!(
    /// Handle of a native home.
    HomeId
);

native_handle!(
    /// Handle of a native room.
    RoomId
);

native_handle!(
    /// Handle of a native zone.
    ZoneId
);

native_handle!(
    /// Handle of a native accessory.
    ///
    /// The same handle is used whether the accessory was reached through the
    /// accessory browser or through a home.
    AccessoryId
);

native_handle!(
    /// Handle of a native service.
    ServiceId
);

native_handle!(
    /// Handle of a native characteristic.
    CharacteristicId
);
