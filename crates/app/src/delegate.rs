//! Delegate shims: native delegate registrations forwarding to user callbacks.
//!
//! A shim holds a single callback set at construction. An event that arrives
//! while no callback is installed is logged and dropped.

use std::sync::Arc;

use homekit_domain::id::AccessoryId;

use crate::ports::{AccessoryBrowserDelegate, HomeManagerDelegate};

type HomesChanged = Arc<dyn Fn() + Send + Sync>;
type AccessoryChanged = Arc<dyn Fn(AccessoryId, bool) + Send + Sync>;

/// Forwards "homes updated" to a callback.
#[derive(Default)]
pub struct HomeManagerDelegateShim {
    callback: Option<HomesChanged>,
}

impl HomeManagerDelegateShim {
    #[must_use]
    pub fn with_callback(callback: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            callback: Some(Arc::new(callback)),
        }
    }
}

impl HomeManagerDelegate for HomeManagerDelegateShim {
    fn home_manager_did_update_homes(&self) {
        if let Some(callback) = &self.callback {
            callback();
        } else {
            tracing::warn!("homes updated but no callback is installed, dropping event");
        }
    }
}

/// Forwards accessory found/removed events to one callback, the boolean
/// flag telling them apart (`true` means removed).
#[derive(Default)]
pub struct AccessoryBrowserDelegateShim {
    callback: Option<AccessoryChanged>,
}

impl AccessoryBrowserDelegateShim {
    #[must_use]
    pub fn with_callback(callback: impl Fn(AccessoryId, bool) + Send + Sync + 'static) -> Self {
        Self {
            callback: Some(Arc::new(callback)),
        }
    }

    fn forward(&self, accessory: AccessoryId, removed: bool) {
        if let Some(callback) = &self.callback {
            callback(accessory, removed);
        } else {
            tracing::warn!(
                %accessory,
                removed,
                "accessory event but no callback is installed, dropping event"
            );
        }
    }
}

impl AccessoryBrowserDelegate for AccessoryBrowserDelegateShim {
    fn accessory_browser_did_find_new_accessory(&self, accessory: AccessoryId) {
        self.forward(accessory, false);
    }

    fn accessory_browser_did_remove_new_accessory(&self, accessory: AccessoryId) {
        self.forward(accessory, true);
    }
}
