//! Async coordination utilities for the mention engine.
//!
//! The engine itself is single threaded and event driven; the only deferred
//! work is candidate lookup resolution. This crate provides the two pieces
//! that keep that safe: generation-counter task cancellation (so a stale
//! lookup can never touch fresher state) and non-freezing channel sends for
//! pushing engine events out of synchronous handlers.

mod cancel;
mod send;

pub use cancel::{
  TaskController,
  TaskHandle,
};
pub use send::{
  send_blocking,
  try_send,
};
