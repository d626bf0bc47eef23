//! Error types shared across the workspace.
//!
//! Every failure surfaced by the adapter is a [`HomeKitError`]. Its `Display`
//! output is the human-readable rejection message and is meant to be shown
//! to the user as is.

/// Top-level error returned by every adapter operation.
#[derive(Debug, thiserror::Error)]
pub enum HomeKitError {
    /// A readiness or argument check failed before any native call.
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    /// A name lookup failed.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The native framework reported a failure.
    #[error(transparent)]
    Native(#[from] NativeError),
}

/// Fixed-message failures raised before the native layer is touched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreconditionError {
    /// `init` was called without a homes-updated callback.
    #[error("Pass in a function that will receive the discovered homes")]
    MissingHomesCallback,

    /// `start_searching_for_accessories` was called without a found callback.
    #[error("Pass in a function that will receive newly found accessories")]
    MissingAccessoryCallback,

    /// The home manager has not been created yet.
    #[error("Run 'init' first")]
    NotInitialized,

    /// The accessory browser has never been created.
    #[error("Please search for accessories first")]
    BrowserNotStarted,
}

/// A by-name lookup found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("No {entity} found for name '{name}'{}", home_scope(.home.as_deref()))]
pub struct NotFoundError {
    /// Kind of object that was looked up (`"home"`, `"room"`, …).
    pub entity: &'static str,
    /// The name that was queried.
    pub name: String,
    /// Home the lookup was scoped to, when the message should mention it.
    pub home: Option<String>,
}

impl NotFoundError {
    /// Lookup failure without a home scope in the message.
    #[must_use]
    pub fn new(entity: &'static str, name: impl Into<String>) -> Self {
        Self {
            entity,
            name: name.into(),
            home: None,
        }
    }

    /// Mention the home the lookup was performed in.
    #[must_use]
    pub fn in_home(mut self, home: impl Into<String>) -> Self {
        self.home = Some(home.into());
        self
    }

    #[must_use]
    pub fn home(name: impl Into<String>) -> Self {
        Self::new("home", name)
    }

    #[must_use]
    pub fn zone(name: impl Into<String>) -> Self {
        Self::new("zone", name)
    }

    #[must_use]
    pub fn room(name: impl Into<String>) -> Self {
        Self::new("room", name)
    }

    #[must_use]
    pub fn accessory(name: impl Into<String>) -> Self {
        Self::new("accessory", name)
    }
}

fn home_scope(home: Option<&str>) -> String {
    home.map(|name| format!(" in home with name '{name}'"))
        .unwrap_or_default()
}

/// Failure reported by the native framework.
///
/// The description is passed through verbatim, never normalised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{description}")]
pub struct NativeError {
    pub description: String,
}

impl NativeError {
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}
