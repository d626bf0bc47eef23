//! Event-stream subscriptions over the callback API.
//!
//! The native delegates fire zero or more times after a single registration.
//! These helpers install a forwarding callback and hand back a
//! [`Stream`](tokio_stream::Stream) of the events instead.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use homekit_domain::accessory::Accessory;
use homekit_domain::error::HomeKitError;
use homekit_domain::home::Home;

use crate::homekit::HomeKit;
use crate::ports::Platform;

/// Stream of home lists, one per native change.
pub type HomesStream = UnboundedReceiverStream<Vec<Home>>;

/// Stream of discovery events.
pub type AccessoryStream = UnboundedReceiverStream<AccessoryEvent>;

/// A discovery event reported by the accessory browser.
#[derive(Debug, Clone, PartialEq)]
pub enum AccessoryEvent {
    Found(Accessory),
    Removed(Accessory),
}

impl AccessoryEvent {
    #[must_use]
    pub fn accessory(&self) -> &Accessory {
        match self {
            Self::Found(acc) | Self::Removed(acc) => acc,
        }
    }
}

impl<P: Platform> HomeKit<P> {
    /// Run [`init`](Self::init) with a callback feeding the returned stream.
    ///
    /// The stream ends once the callback is replaced by another `init`.
    ///
    /// # Errors
    ///
    /// Propagates the errors of `init`.
    pub async fn watch_homes(&mut self) -> Result<HomesStream, HomeKitError> {
        let (tx, rx) = mpsc::unbounded_channel::<Vec<Home>>();
        self.init(Some(Arc::new(move |homes: Vec<Home>| {
            if tx.send(homes).is_err() {
                tracing::debug!("homes stream dropped, discarding update");
            }
        })))
        .await?;
        Ok(UnboundedReceiverStream::new(rx))
    }

    /// Start searching with callbacks feeding the returned stream.
    ///
    /// # Errors
    ///
    /// Propagates the errors of
    /// [`start_searching_for_accessories`](Self::start_searching_for_accessories).
    pub async fn watch_accessories(&mut self) -> Result<AccessoryStream, HomeKitError> {
        let (tx, rx) = mpsc::unbounded_channel::<AccessoryEvent>();
        let removed_tx = tx.clone();
        self.start_searching_for_accessories(
            Some(Arc::new(move |acc: Accessory| {
                if tx.send(AccessoryEvent::Found(acc)).is_err() {
                    tracing::debug!("accessory stream dropped, discarding found event");
                }
            })),
            Some(Arc::new(move |acc: Accessory| {
                if removed_tx.send(AccessoryEvent::Removed(acc)).is_err() {
                    tracing::debug!("accessory stream dropped, discarding removed event");
                }
            })),
        )
        .await?;
        Ok(UnboundedReceiverStream::new(rx))
    }
}
