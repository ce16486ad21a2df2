//! Candidate lookup collaborators.

use tagline_event::TaskHandle;

use crate::{
  candidate::Candidate,
  error::LookupError,
  filter,
};

/// Outcome of a lookup request.
pub enum Lookup {
  /// The result is available synchronously.
  Ready(Result<Vec<Candidate>, LookupError>),
  /// The source will deliver later through
  /// [`crate::controller::MentionController::resolve_lookup`], passing back
  /// the same [`TaskHandle`] it received here.
  Pending,
}

/// Supplied by the host application. One request produces one eventual
/// result; a source never streams successive updates for the same query.
pub trait CandidateSource {
  fn find(&mut self, query: &str, limit: usize, handle: TaskHandle) -> Lookup;
}

/// Synchronous source over an owned candidate pool.
pub struct StaticPool {
  pool: Vec<Candidate>,
}

impl StaticPool {
  pub fn new(pool: Vec<Candidate>) -> Self {
    Self { pool }
  }
}

impl CandidateSource for StaticPool {
  fn find(&mut self, query: &str, limit: usize, _handle: TaskHandle) -> Lookup {
    Lookup::Ready(Ok(filter::filter(&self.pool, query, limit)))
  }
}
