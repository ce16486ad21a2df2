//! The trigger session state machine.
//!
//! A session is the bounded interval between a trigger character being typed
//! and the overlay going away again. While it lives it owns the overlay
//! state, the presentation handle and the cancellation controller for
//! candidate lookups, so dropping the session disposes the overlay and
//! invalidates every in-flight lookup in one move. Session existence and
//! overlay existence coincide structurally instead of being re-checked.

use tagline_event::TaskController;

use crate::{
  anchor::Point,
  candidate::Candidate,
  config::MentionConfig,
  error::LookupError,
  event::InsertionEvent,
  markup,
  offset,
  overlay::{
    OverlayHandle,
    SuggestionOverlay,
  },
  source::{
    CandidateSource,
    Lookup,
  },
  surface::Surface,
};

/// Whether the session survives the event that was just handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
  Open,
  Closed,
}

pub struct TriggerSession<H> {
  /// Plain-text offset where the trigger character sits.
  trigger_offset:          usize,
  /// Plain-text slice between the trigger and the caret.
  search_text:             String,
  /// Markup caret cached when the surface loses focus; preferred as the
  /// splice end on confirmation, since selection state after a refocus is
  /// not reliable on every host.
  last_known_markup_caret: Option<usize>,
  overlay:                 SuggestionOverlay,
  view:                    H,
  lookups:                 TaskController,
}

impl<H: OverlayHandle> TriggerSession<H> {
  pub fn open(trigger_offset: usize, position: Point, visible: usize, view: H) -> Self {
    Self {
      trigger_offset,
      search_text: String::new(),
      last_known_markup_caret: None,
      overlay: SuggestionOverlay::new(position, visible),
      view,
      lookups: TaskController::new(),
    }
  }

  pub fn trigger_offset(&self) -> usize {
    self.trigger_offset
  }

  pub fn search_text(&self) -> &str {
    &self.search_text
  }

  pub fn overlay(&self) -> &SuggestionOverlay {
    &self.overlay
  }

  pub fn overlay_mut(&mut self) -> &mut SuggestionOverlay {
    &mut self.overlay
  }

  /// Push the current overlay state into the presentation handle.
  pub fn render(&mut self) {
    self.view.render(&self.overlay);
  }

  /// Re-derive the search window after an input event and, when it is still
  /// valid, request fresh candidates.
  pub fn refresh(
    &mut self,
    surface: &mut dyn Surface,
    config: &MentionConfig,
    source: &mut dyn CandidateSource,
  ) -> SessionStatus {
    let plain = surface.plain_text();
    if plain.chars().nth(self.trigger_offset) != Some(config.trigger_character) {
      return SessionStatus::Closed;
    }

    let cursor = match offset::plain_offset(surface) {
      Ok(cursor) => cursor,
      Err(err) => {
        log::warn!("closing mention session, caret unavailable: {err}");
        return SessionStatus::Closed;
      },
    };
    if cursor < self.trigger_offset {
      return SessionStatus::Closed;
    }

    let search: String = plain
      .chars()
      .skip(self.trigger_offset + 1)
      .take(cursor.saturating_sub(self.trigger_offset + 1))
      .collect();
    if !config.search_pattern.is_match(&search) {
      return SessionStatus::Closed;
    }

    self.search_text = search;
    self.overlay.begin_lookup();
    let handle = self.lookups.restart();
    match source.find(&self.search_text, config.max_suggestions, handle) {
      Lookup::Ready(Ok(choices)) => self.overlay.set_candidates(choices),
      Lookup::Ready(Err(error)) => {
        log::debug!("candidate lookup failed for {:?}: {error}", self.search_text);
        self.overlay.set_error(error);
      },
      Lookup::Pending => {},
    }
    SessionStatus::Open
  }

  /// Apply a lookup resolution. The caller has already verified the handle
  /// is still current.
  pub fn apply_lookup(&mut self, result: Result<Vec<Candidate>, LookupError>) {
    match result {
      Ok(choices) => self.overlay.set_candidates(choices),
      Err(error) => self.overlay.set_error(error),
    }
  }

  /// Cache the markup caret while the surface is unfocused.
  pub fn cache_markup_caret(&mut self, surface: &mut dyn Surface) {
    self.last_known_markup_caret = offset::markup_offset(surface).ok();
  }

  /// Splice the confirmed candidate into the surface markup, replacing the
  /// trigger character through the end of the search text with a rendered
  /// tag and a zero-width joiner, and park the caret right after the
  /// joiner.
  ///
  /// The replacement range is computed and validated before the markup is
  /// touched; an inconsistent range aborts without mutating anything.
  pub fn confirm(&mut self, surface: &mut dyn Surface, tag_id: u64) -> Option<InsertionEvent> {
    let candidate = self.overlay.confirm_selection()?;

    let markup_caret = match offset::markup_offset(surface) {
      Ok(caret) => caret,
      Err(err) => {
        log::warn!("cannot place mention, markup caret unavailable: {err}");
        return None;
      },
    };
    let search_len = self.search_text.chars().count();
    let Some(start) = markup_caret.checked_sub(search_len + 1) else {
      log::warn!("mention splice start underflows, aborting");
      return None;
    };
    let markup_len = surface.markup().chars().count();
    let end = self
      .last_known_markup_caret
      .unwrap_or(markup_caret)
      .min(markup_len);
    if end < start {
      log::warn!("mention splice range is inverted, aborting");
      return None;
    }

    surface.splice_markup(start..end, &markup::render_tag(tag_id, &candidate.name));
    let name_len = candidate.name.chars().count();
    // caret lands just past the joiner
    surface.set_plain_caret(self.trigger_offset + name_len + 1);

    Some(InsertionEvent {
      start: self.trigger_offset,
      end: self.trigger_offset + name_len,
      candidate,
    })
  }
}

impl<H> Drop for TriggerSession<H> {
  fn drop(&mut self) {
    // a closed session must never see its lookups land
    self.lookups.cancel();
  }
}

#[cfg(test)]
mod test {
  use tagline_event::TaskHandle;

  use super::*;
  use crate::{
    buffer::MarkupBuffer,
    markup::ZERO_WIDTH_JOINER,
    source::StaticPool,
  };

  struct NullView;

  impl OverlayHandle for NullView {
    fn render(&mut self, _overlay: &SuggestionOverlay) {}
  }

  fn pool() -> StaticPool {
    StaticPool::new(vec![
      Candidate::new("Alice"),
      Candidate::new("Alicia"),
      Candidate::new("Bob"),
    ])
  }

  fn session_at(trigger_offset: usize) -> TriggerSession<NullView> {
    TriggerSession::open(trigger_offset, Point::default(), 5, NullView)
  }

  #[test]
  fn search_text_is_the_slice_after_the_trigger() {
    let mut buffer = MarkupBuffer::new();
    buffer.insert_text("hi @ali");
    let mut session = session_at(3);
    let status = session.refresh(&mut buffer, &MentionConfig::default(), &mut pool());
    assert_eq!(status, SessionStatus::Open);
    assert_eq!(session.search_text(), "ali");
    let names: Vec<&str> = session.overlay().choices().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Alice", "Alicia"]);
  }

  #[test]
  fn vanished_trigger_closes_the_session() {
    let mut buffer = MarkupBuffer::new();
    buffer.insert_text("hi ali");
    let mut session = session_at(3);
    let status = session.refresh(&mut buffer, &MentionConfig::default(), &mut pool());
    assert_eq!(status, SessionStatus::Closed);
  }

  #[test]
  fn caret_before_the_trigger_closes_the_session() {
    let mut buffer = MarkupBuffer::new();
    buffer.insert_text("hi @ali");
    buffer.set_plain_caret(1);
    let mut session = session_at(3);
    let status = session.refresh(&mut buffer, &MentionConfig::default(), &mut pool());
    assert_eq!(status, SessionStatus::Closed);
  }

  #[test]
  fn invalid_search_text_closes_the_session() {
    let mut buffer = MarkupBuffer::new();
    buffer.insert_text("@a b");
    let mut session = session_at(0);
    let status = session.refresh(&mut buffer, &MentionConfig::default(), &mut pool());
    assert_eq!(status, SessionStatus::Closed);
  }

  #[test]
  fn confirm_replaces_trigger_and_search_text() {
    let mut buffer = MarkupBuffer::new();
    buffer.insert_text("hi @ali");
    let mut session = session_at(3);
    session.refresh(&mut buffer, &MentionConfig::default(), &mut pool());

    let insertion = session.confirm(&mut buffer, 1).expect("insertion happens");
    assert_eq!(insertion.candidate.name, "Alice");
    assert_eq!(insertion.start, 3);
    assert_eq!(insertion.end, 8);
    assert_eq!(buffer.plain_text(), format!("hi Alice{}", ZERO_WIDTH_JOINER));
    assert_eq!(
      buffer.markup(),
      format!("hi <span class='name' id='span1'>Alice</span>{}", ZERO_WIDTH_JOINER)
    );
    // caret parked right after the joiner
    assert_eq!(buffer.plain_caret(), Some(9));
  }

  #[test]
  fn confirm_with_empty_overlay_is_a_no_op() {
    let mut buffer = MarkupBuffer::new();
    buffer.insert_text("hi @zzz");
    let mut session = session_at(3);
    session.refresh(&mut buffer, &MentionConfig::default(), &mut pool());
    let before = buffer.markup();
    assert!(session.confirm(&mut buffer, 1).is_none());
    assert_eq!(buffer.markup(), before);
  }

  #[test]
  fn cached_blur_caret_bounds_the_splice() {
    let mut buffer = MarkupBuffer::new();
    buffer.insert_text("hi @ali");
    let mut session = session_at(3);
    session.refresh(&mut buffer, &MentionConfig::default(), &mut pool());
    session.cache_markup_caret(&mut buffer);

    let insertion = session.confirm(&mut buffer, 1).expect("insertion happens");
    assert_eq!(insertion.start, 3);
    assert_eq!(buffer.plain_text(), format!("hi Alice{}", ZERO_WIDTH_JOINER));
  }

  #[test]
  fn dropping_the_session_cancels_lookups() {
    struct CapturingSource {
      handles: std::rc::Rc<std::cell::RefCell<Vec<TaskHandle>>>,
    }

    impl CandidateSource for CapturingSource {
      fn find(&mut self, _query: &str, _limit: usize, handle: TaskHandle) -> Lookup {
        self.handles.borrow_mut().push(handle);
        Lookup::Pending
      }
    }

    let handles = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let mut source = CapturingSource {
      handles: std::rc::Rc::clone(&handles),
    };

    let mut buffer = MarkupBuffer::new();
    buffer.insert_text("@a");
    let mut session = session_at(0);
    session.refresh(&mut buffer, &MentionConfig::default(), &mut source);

    let handle = handles.borrow_mut().pop().expect("lookup issued");
    assert!(!handle.is_canceled());
    drop(session);
    assert!(handle.is_canceled());
  }
}
