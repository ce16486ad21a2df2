//! Caret offset tracking over a host surface.
//!
//! The engine needs the caret in two coordinate systems at once: plain-text
//! offsets drive the trigger/search window, markup offsets drive the splice
//! on confirmation. Plain offsets come from the surface's native selection
//! mechanism (with a legacy text-range fallback). Markup offsets are
//! resolved by briefly parking a marker character at the caret, locating it
//! in the serialized markup and removing it again; the surface guarantees
//! the dance is atomic, so the host never observes the marker.
//!
//! Both readings describe the same instantaneous caret; callers must read
//! the markup offset before any markup mutation invalidates it.

use crate::{
  error::OffsetError,
  surface::Surface,
};

/// Marker parked at the caret while resolving markup offsets.
pub const CARET_MARKER: char = '\u{0001}';

/// One caret, both coordinate systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaretOffsets {
  pub plain:  usize,
  pub markup: usize,
}

/// The caret's position counted in plain-text chars.
pub fn plain_offset(surface: &dyn Surface) -> Result<usize, OffsetError> {
  surface
    .plain_caret()
    .or_else(|| surface.plain_caret_legacy())
    .ok_or(OffsetError::SelectionUnavailable)
}

/// The caret's position counted in serialized-markup chars.
pub fn markup_offset(surface: &mut dyn Surface) -> Result<usize, OffsetError> {
  if !surface.insert_marker_at_caret(CARET_MARKER) {
    return Err(OffsetError::SelectionUnavailable);
  }
  let position = surface.markup().chars().position(|c| c == CARET_MARKER);
  surface.remove_marker(CARET_MARKER);
  position.ok_or(OffsetError::MarkerLost)
}

/// Both offsets for the same instantaneous caret.
pub fn caret_offsets(surface: &mut dyn Surface) -> Result<CaretOffsets, OffsetError> {
  let plain = plain_offset(surface)?;
  let markup = markup_offset(surface)?;
  Ok(CaretOffsets { plain, markup })
}
