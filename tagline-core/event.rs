use serde::Serialize;

use crate::candidate::Candidate;

/// Emitted when a confirmed choice has been spliced into the surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsertionEvent {
  pub candidate: Candidate,
  /// Half-open plain-text range the inserted tag occupies post-insertion.
  pub start:     usize,
  pub end:       usize,
}

/// Events the engine raises towards the host application.
#[derive(Debug, Clone, PartialEq)]
pub enum MentionEvent {
  MenuShown,
  MenuHidden,
  ChoiceSelected(InsertionEvent),
}
