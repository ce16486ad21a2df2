//! Channel sends that never freeze the caller.

use std::time::Duration;

use futures_executor::block_on;
use tokio::sync::mpsc::{
  Sender,
  error::TrySendError,
};

/// Maximum time to block when a channel is full. Dropping a message beats
/// stalling the surface's event handler.
const SEND_TIMEOUT_MS: u64 = 2;

/// Send an event from synchronous code, blocking at most briefly.
///
/// Tries a non-blocking send first; if the channel is full, blocks for up to
/// [`SEND_TIMEOUT_MS`] milliseconds and then gives the message up.
pub fn send_blocking<T>(tx: &Sender<T>, data: T) {
  match tx.try_send(data) {
    Ok(()) => {},
    Err(TrySendError::Full(data)) => {
      let _ = block_on(tx.send_timeout(data, Duration::from_millis(SEND_TIMEOUT_MS)));
    },
    Err(TrySendError::Closed(_)) => {
      log::warn!("dropping event: channel closed");
    },
  }
}

/// Send without blocking at all. Returns whether the event was accepted.
pub fn try_send<T>(tx: &Sender<T>, data: T) -> bool {
  tx.try_send(data).is_ok()
}
