//! Generation-counter cancellation for in-flight work.
//!
//! A [`TaskController`] hands out [`TaskHandle`]s, one per unit of work.
//! Restarting or canceling the controller bumps a shared generation counter,
//! which invalidates every handle produced before the bump. Handles are
//! cheap to clone and travel with the work they belong to; whoever receives
//! the finished result checks [`TaskHandle::is_canceled`] before applying it.

use std::sync::{
  Arc,
  atomic::{
    AtomicU64,
    Ordering,
  },
};

/// Owned by the party issuing cancelable work.
#[derive(Debug, Default)]
pub struct TaskController {
  generation: Arc<AtomicU64>,
}

impl TaskController {
  pub fn new() -> Self {
    Self::default()
  }

  /// Invalidate every outstanding handle and hand out a fresh one for the
  /// next unit of work.
  pub fn restart(&mut self) -> TaskHandle {
    let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
    TaskHandle {
      generation,
      current: Arc::clone(&self.generation),
    }
  }

  /// Invalidate every outstanding handle without starting new work.
  pub fn cancel(&mut self) {
    self.generation.fetch_add(1, Ordering::Relaxed);
  }

  /// Whether any handle is still alive. Canceled handles that have not been
  /// dropped yet also count, so this is an upper bound on in-flight work.
  pub fn is_running(&self) -> bool {
    Arc::strong_count(&self.generation) > 1
  }
}

/// Travels with a single unit of cancelable work.
#[derive(Debug, Clone)]
pub struct TaskHandle {
  generation: u64,
  current:    Arc<AtomicU64>,
}

impl TaskHandle {
  /// True once the controller has restarted or canceled since this handle
  /// was created. A canceled handle's result must be discarded.
  pub fn is_canceled(&self) -> bool {
    self.generation != self.current.load(Ordering::Relaxed)
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn fresh_handle_is_live() {
    let mut controller = TaskController::new();
    let handle = controller.restart();
    assert!(!handle.is_canceled());
  }

  #[test]
  fn restart_invalidates_previous_handles() {
    let mut controller = TaskController::new();
    let first = controller.restart();
    let second = controller.restart();
    assert!(first.is_canceled());
    assert!(!second.is_canceled());
  }

  #[test]
  fn cancel_invalidates_without_replacement() {
    let mut controller = TaskController::new();
    let handle = controller.restart();
    controller.cancel();
    assert!(handle.is_canceled());
  }

  #[test]
  fn clones_share_cancellation() {
    let mut controller = TaskController::new();
    let handle = controller.restart();
    let clone = handle.clone();
    controller.cancel();
    assert!(handle.is_canceled());
    assert!(clone.is_canceled());
  }

  #[test]
  fn running_reflects_live_handles() {
    let mut controller = TaskController::new();
    assert!(!controller.is_running());
    let handle = controller.restart();
    assert!(controller.is_running());
    drop(handle);
    assert!(!controller.is_running());
  }
}
