//! Substring filtering over candidate pools.
//!
//! This is deliberately not fuzzy matching: the suggestion list mirrors what
//! the user typed, so a plain case-insensitive substring test against each
//! candidate's display name is the whole algorithm. Pool order is preserved
//! among matches and the result is truncated to the requested limit, which
//! keeps the function pure and deterministic: filtering its own output with
//! the same query is a no-op.

use crate::candidate::Candidate;

/// Default number of suggestions shown when the host does not configure one.
pub const DEFAULT_LIMIT: usize = 5;

/// Case-insensitive substring match against each candidate's display name.
/// An empty query matches everything (still bounded by `limit`).
pub fn filter(pool: &[Candidate], query: &str, limit: usize) -> Vec<Candidate> {
  let needle = query.to_lowercase();
  pool
    .iter()
    .filter(|candidate| candidate.name.to_lowercase().contains(&needle))
    .take(limit)
    .cloned()
    .collect()
}
