//! The per-surface controller.
//!
//! `MentionController` binds the engine to one surface's event stream. It
//! owns at most one [`TriggerSession`] (holding it in an `Option` is what
//! makes the single-session invariant a type-level fact) and routes every
//! surface event through it: keydowns open sessions and navigate the
//! overlay, input events re-derive the search window, blur caches the
//! caret, clicks focus inserted tags. Keys the overlay consumed are
//! reported back as [`KeyOutcome::Consumed`] so the host can suppress the
//! surface's default handling.
//!
//! Event ordering contract: key events arrive before the keystroke is
//! applied to the surface, input events after, the same order a browser
//! delivers keydown and input.

use tagline_event::{
  TaskHandle,
  send_blocking,
};
use tokio::sync::mpsc::Sender;

use crate::{
  anchor,
  candidate::Candidate,
  config::MentionConfig,
  error::LookupError,
  event::MentionEvent,
  offset,
  overlay::{
    Direction,
    OverlayPresenter,
  },
  session::{
    SessionStatus,
    TriggerSession,
  },
  source::CandidateSource,
  surface::Surface,
};

/// Keys the controller cares about. Everything else never reaches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
  Char(char),
  ArrowUp,
  ArrowDown,
  Enter,
  Backspace,
  Delete,
}

/// Whether the host must suppress the surface's default key handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
  Consumed,
  Passed,
}

pub struct MentionController<P: OverlayPresenter> {
  config:    MentionConfig,
  source:    Box<dyn CandidateSource>,
  presenter: P,
  events:    Sender<MentionEvent>,
  session:   Option<TriggerSession<P::Handle>>,
  /// Ids handed to rendered tag nodes, `span1` upward.
  tag_ids:   u64,
}

impl<P: OverlayPresenter> MentionController<P> {
  pub fn new(
    config: MentionConfig,
    source: Box<dyn CandidateSource>,
    presenter: P,
    events: Sender<MentionEvent>,
  ) -> Self {
    Self {
      config,
      source,
      presenter,
      events,
      session: None,
      tag_ids: 0,
    }
  }

  pub fn is_open(&self) -> bool {
    self.session.is_some()
  }

  /// Handle a keydown, before the surface applies it.
  pub fn on_key(&mut self, surface: &mut dyn Surface, key: Key) -> KeyOutcome {
    match key {
      Key::Char(c) if c == self.config.trigger_character => {
        self.open_session(surface);
        // the trigger character itself is still typed into the surface
        KeyOutcome::Passed
      },
      Key::Char(_) => KeyOutcome::Passed,
      Key::ArrowDown => self.move_selection(Direction::Next),
      Key::ArrowUp => self.move_selection(Direction::Previous),
      Key::Enter => self.accept_active(surface),
      Key::Backspace | Key::Delete => self.delete_tag_at_caret(surface),
    }
  }

  /// Handle an input event, after the surface applied an edit.
  pub fn on_input(&mut self, surface: &mut dyn Surface) {
    let Some(session) = self.session.as_mut() else {
      return;
    };
    match session.refresh(surface, &self.config, self.source.as_mut()) {
      SessionStatus::Open => session.render(),
      SessionStatus::Closed => self.close_session(),
    }
  }

  /// Handle a click that put the caret at `offset`.
  pub fn on_click(&mut self, surface: &mut dyn Surface, offset: usize) {
    if self.config.tag_focus_on_click {
      if let Some(tag) = surface.tag_at(offset) {
        surface.select_plain_range(tag.plain_range.clone());
      }
    }
    // a click can carry the caret before the trigger; re-validate
    let moved_before_trigger = match self.session.as_ref() {
      Some(session) => {
        matches!(offset::plain_offset(surface), Ok(cursor) if cursor < session.trigger_offset())
      },
      None => false,
    };
    if moved_before_trigger {
      self.close_session();
    }
  }

  /// Handle the surface losing focus. Does not close the session.
  pub fn on_blur(&mut self, surface: &mut dyn Surface) {
    if let Some(session) = self.session.as_mut() {
      session.cache_markup_caret(surface);
    }
  }

  /// Deliver a deferred lookup resolution. Late results for a query that is
  /// no longer current (the text changed, the session closed) arrive with a
  /// canceled handle and are dropped without touching overlay state.
  pub fn resolve_lookup(
    &mut self,
    handle: &TaskHandle,
    result: Result<Vec<Candidate>, LookupError>,
  ) {
    if handle.is_canceled() {
      log::debug!("discarding stale candidate lookup");
      return;
    }
    let Some(session) = self.session.as_mut() else {
      return;
    };
    session.apply_lookup(result);
    session.render();
  }

  /// Confirm the active candidate, as a presenter does when an entry is
  /// clicked. Equivalent to Enter.
  pub fn confirm_active(&mut self, surface: &mut dyn Surface) {
    self.accept_active(surface);
  }

  /// Tear the controller down with its surface. Closes any open session.
  pub fn dispose(&mut self) {
    self.close_session();
  }

  fn open_session(&mut self, surface: &mut dyn Surface) {
    if self.session.is_some() {
      return;
    }
    // keydown precedes the edit: this is where the trigger char will land
    let trigger_offset = match offset::plain_offset(surface) {
      Ok(offset) => offset,
      Err(err) => {
        log::warn!("not opening mention session, caret unavailable: {err}");
        return;
      },
    };
    let position = anchor::anchor_overlay(
      surface.caret_rect(),
      surface.bounding_rect(),
      surface.line_height(),
    );
    let view = self.presenter.present(position);
    let mut session =
      TriggerSession::open(trigger_offset, position, self.config.max_suggestions, view);
    session.render();
    self.session = Some(session);
    send_blocking(&self.events, MentionEvent::MenuShown);
  }

  fn close_session(&mut self) {
    // dropping the session disposes the view and cancels in-flight lookups
    if self.session.take().is_some() {
      send_blocking(&self.events, MentionEvent::MenuHidden);
    }
  }

  fn move_selection(&mut self, direction: Direction) -> KeyOutcome {
    let Some(session) = self.session.as_mut() else {
      return KeyOutcome::Passed;
    };
    session.overlay_mut().move_selection(direction);
    session.render();
    KeyOutcome::Consumed
  }

  fn accept_active(&mut self, surface: &mut dyn Surface) -> KeyOutcome {
    let insertion = {
      let Some(session) = self.session.as_mut() else {
        return KeyOutcome::Passed;
      };
      if session.overlay().active().is_none() {
        // nothing to confirm: the surface keeps its default Enter
        return KeyOutcome::Passed;
      }
      self.tag_ids += 1;
      session.confirm(surface, self.tag_ids)
    };
    if let Some(event) = insertion {
      self.close_session();
      send_blocking(&self.events, MentionEvent::ChoiceSelected(event));
    }
    KeyOutcome::Consumed
  }

  /// Inserted tags delete as a single unit: when the caret sits inside one,
  /// Backspace/Delete removes the whole node instead of eroding it.
  fn delete_tag_at_caret(&mut self, surface: &mut dyn Surface) -> KeyOutcome {
    match surface.tag_containing_caret() {
      Some(tag) => {
        surface.remove_tag(&tag);
        KeyOutcome::Consumed
      },
      None => KeyOutcome::Passed,
    }
  }
}

impl<P: OverlayPresenter> Drop for MentionController<P> {
  fn drop(&mut self) {
    self.close_session();
  }
}
