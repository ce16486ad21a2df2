//! Inline "mention"-style autocomplete engine.
//!
//! Typing a trigger character on an editable surface opens a filtered
//! suggestion overlay anchored near the caret; confirming an entry replaces
//! the typed search text with a rendered inline tag. The engine is the state
//! machine in the middle: it tracks offsets in the mutable text, coordinates
//! the overlay's lifecycle and keeps both consistent across keystrokes,
//! clicks and asynchronous candidate lookups. Rendering, candidate data and
//! the surface itself are supplied by the host through the [`surface`],
//! [`source`] and [`overlay`] traits.

pub mod anchor;
pub mod buffer;
pub mod candidate;
pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod filter;
pub mod markup;
pub mod offset;
pub mod overlay;
pub mod session;
pub mod source;
pub mod surface;

pub use crate::{
  buffer::MarkupBuffer,
  candidate::{
    Candidate,
    CandidateId,
  },
  config::MentionConfig,
  controller::{
    Key,
    KeyOutcome,
    MentionController,
  },
  error::{
    ConfigError,
    LookupError,
    OffsetError,
  },
  event::{
    InsertionEvent,
    MentionEvent,
  },
  overlay::{
    OverlayHandle,
    OverlayPresenter,
    SuggestionOverlay,
  },
  source::{
    CandidateSource,
    Lookup,
    StaticPool,
  },
  surface::Surface,
};
