//! The host-surface abstraction.
//!
//! The engine never talks to a concrete text widget; it reads and mutates an
//! editable surface through this trait. A browser host would back it with
//! DOM selection/range APIs, [`crate::buffer::MarkupBuffer`] backs it with a
//! rope for tests and headless drivers. All offsets are char offsets; see
//! [`crate::markup`] for the plain-text vs markup distinction.

use std::ops::Range;

use crate::{
  anchor::Rect,
  markup::TagSpan,
};

pub trait Surface {
  /// Serialized rich content of the surface.
  fn markup(&self) -> String;

  /// Plain-text projection of the markup.
  fn plain_text(&self) -> String;

  /// Caret offset in plain-text chars via the host's native selection
  /// mechanism, if one is available.
  fn plain_caret(&self) -> Option<usize>;

  /// Legacy text-range fallback for hosts without a native selection API.
  fn plain_caret_legacy(&self) -> Option<usize> {
    None
  }

  /// Insert `marker` into the markup at the caret. Must be atomic with
  /// respect to the markup: the host must not observe the intermediate
  /// state. Returns false when there is no caret to mark.
  fn insert_marker_at_caret(&mut self, marker: char) -> bool;

  /// Remove every occurrence of `marker` from the markup.
  fn remove_marker(&mut self, marker: char);

  /// Replace a markup char range with `replacement`.
  fn splice_markup(&mut self, range: Range<usize>, replacement: &str);

  /// Collapse the selection to a plain-text offset.
  fn set_plain_caret(&mut self, offset: usize);

  /// Select a plain-text range (used to focus an inline tag).
  fn select_plain_range(&mut self, range: Range<usize>);

  /// Bounding rectangle of the current selection. `None` or a zero-sized
  /// rectangle when the host reports a degenerate selection.
  fn caret_rect(&self) -> Option<Rect>;

  /// Bounding rectangle of the surface itself.
  fn bounding_rect(&self) -> Rect;

  /// Line height used to drop the overlay below the caret.
  fn line_height(&self) -> f32;

  /// The inline tag whose plain-text range contains `offset`, if any.
  fn tag_at(&self, offset: usize) -> Option<TagSpan>;

  /// The inline tag containing the caret, if any.
  fn tag_containing_caret(&self) -> Option<TagSpan>;

  /// Remove an inline tag as a single unit.
  fn remove_tag(&mut self, tag: &TagSpan);
}
