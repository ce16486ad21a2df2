//! Rope-backed in-memory surface.
//!
//! `MarkupBuffer` is the concrete [`Surface`] used by tests and headless
//! drivers. It stores the serialized markup in a [`ropey::Rope`], keeps a
//! plain-text selection next to it and simulates the geometry a real host
//! would report (including the zero-sized caret rectangle an empty surface
//! produces, so the anchoring fallback stays honest). Editing helpers like
//! [`MarkupBuffer::insert_text`] belong to the driver side: the engine core
//! only ever mutates markup through the [`Surface`] trait.

use std::ops::Range;

use ropey::Rope;

use crate::{
  anchor::Rect,
  markup::{
    self,
    TagSpan,
  },
  surface::Surface,
};

/// Display geometry reported by the buffer.
#[derive(Debug, Clone, Copy)]
pub struct BufferMetrics {
  pub bounding:    Rect,
  pub line_height: f32,
  pub char_width:  f32,
}

impl Default for BufferMetrics {
  fn default() -> Self {
    Self {
      bounding:    Rect {
        top:    8.0,
        left:   8.0,
        width:  480.0,
        height: 120.0,
      },
      line_height: 16.0,
      char_width:  8.0,
    }
  }
}

pub struct MarkupBuffer {
  markup:           Rope,
  /// Current selection in plain-text chars; collapsed selections are the
  /// caret. `None` models a surface that has never been focused.
  selection:        Option<Range<usize>>,
  metrics:          BufferMetrics,
  /// When false the native selection path reports nothing and callers must
  /// go through the legacy fallback.
  native_selection: bool,
}

impl MarkupBuffer {
  pub fn new() -> Self {
    Self {
      markup:           Rope::new(),
      selection:        Some(0..0),
      metrics:          BufferMetrics::default(),
      native_selection: true,
    }
  }

  pub fn from_markup(markup: &str) -> Self {
    let mut buffer = Self::new();
    buffer.markup = Rope::from_str(markup);
    let end = buffer.plain_len();
    buffer.selection = Some(end..end);
    buffer
  }

  pub fn with_metrics(mut self, metrics: BufferMetrics) -> Self {
    self.metrics = metrics;
    self
  }

  /// Degrade the buffer to legacy-only selection reporting.
  pub fn without_native_selection(mut self) -> Self {
    self.native_selection = false;
    self
  }

  pub fn plain_len(&self) -> usize {
    self.plain_text().chars().count()
  }

  fn caret(&self) -> Option<usize> {
    self.selection.as_ref().map(|range| range.end.min(self.plain_len()))
  }

  /// Insert text at the caret, as the host's default editing would.
  pub fn insert_text(&mut self, text: &str) {
    let caret = self.caret().unwrap_or_else(|| self.plain_len());
    let at = markup::plain_to_markup(&self.markup.to_string(), caret);
    self.markup.insert(at, text);
    let caret = caret + text.chars().count();
    self.selection = Some(caret..caret);
  }

  /// Delete the plain char before the caret.
  pub fn delete_backward(&mut self) {
    let Some(caret) = self.caret() else {
      return;
    };
    if caret == 0 {
      return;
    }
    let at = markup::plain_to_markup(&self.markup.to_string(), caret - 1);
    self.markup.remove(at..at + 1);
    self.selection = Some(caret - 1..caret - 1);
  }

  /// Delete the plain char at the caret.
  pub fn delete_forward(&mut self) {
    let Some(caret) = self.caret() else {
      return;
    };
    if caret >= self.plain_len() {
      return;
    }
    let at = markup::plain_to_markup(&self.markup.to_string(), caret);
    self.markup.remove(at..at + 1);
  }
}

impl Default for MarkupBuffer {
  fn default() -> Self {
    Self::new()
  }
}

impl Surface for MarkupBuffer {
  fn markup(&self) -> String {
    self.markup.to_string()
  }

  fn plain_text(&self) -> String {
    markup::plain_text_of(&self.markup.to_string())
  }

  fn plain_caret(&self) -> Option<usize> {
    if self.native_selection { self.caret() } else { None }
  }

  fn plain_caret_legacy(&self) -> Option<usize> {
    self.caret()
  }

  fn insert_marker_at_caret(&mut self, marker: char) -> bool {
    let Some(caret) = self.caret() else {
      return false;
    };
    let at = markup::plain_to_markup(&self.markup.to_string(), caret);
    self.markup.insert(at, &marker.to_string());
    true
  }

  fn remove_marker(&mut self, marker: char) {
    while let Some(at) = self.markup.chars().position(|c| c == marker) {
      self.markup.remove(at..at + 1);
    }
  }

  fn splice_markup(&mut self, range: Range<usize>, replacement: &str) {
    let len = self.markup.len_chars();
    let start = range.start.min(len);
    let end = range.end.min(len).max(start);
    self.markup.remove(start..end);
    self.markup.insert(start, replacement);
  }

  fn set_plain_caret(&mut self, offset: usize) {
    let offset = offset.min(self.plain_len());
    self.selection = Some(offset..offset);
  }

  fn select_plain_range(&mut self, range: Range<usize>) {
    let len = self.plain_len();
    let start = range.start.min(len);
    let end = range.end.min(len).max(start);
    self.selection = Some(start..end);
  }

  fn caret_rect(&self) -> Option<Rect> {
    let caret = self.caret()?;
    if self.markup.len_chars() == 0 {
      // Hosts report a collapsed zero rectangle on an empty surface.
      return Some(Rect::ZERO);
    }
    let before: String = self.plain_text().chars().take(caret).collect();
    let row = before.matches('\n').count();
    let col = before.chars().rev().take_while(|c| *c != '\n').count();
    Some(Rect {
      top:    self.metrics.bounding.top + row as f32 * self.metrics.line_height,
      left:   self.metrics.bounding.left + col as f32 * self.metrics.char_width,
      width:  0.0,
      height: self.metrics.line_height,
    })
  }

  fn bounding_rect(&self) -> Rect {
    self.metrics.bounding
  }

  fn line_height(&self) -> f32 {
    self.metrics.line_height
  }

  fn tag_at(&self, offset: usize) -> Option<TagSpan> {
    markup::tag_spans(&self.markup.to_string())
      .into_iter()
      .find(|tag| tag.plain_range.contains(&offset))
  }

  fn tag_containing_caret(&self) -> Option<TagSpan> {
    self.caret().and_then(|caret| self.tag_at(caret))
  }

  fn remove_tag(&mut self, tag: &TagSpan) {
    self.splice_markup(tag.markup_range.clone(), "");
    self.selection = Some(tag.plain_range.start..tag.plain_range.start);
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::markup::{
    ZERO_WIDTH_JOINER,
    render_tag,
  };

  #[test]
  fn typing_advances_the_caret() {
    let mut buffer = MarkupBuffer::new();
    buffer.insert_text("hello");
    assert_eq!(buffer.plain_text(), "hello");
    assert_eq!(buffer.plain_caret(), Some(5));
  }

  #[test]
  fn plain_text_hides_tag_syntax() {
    let buffer = MarkupBuffer::from_markup(&format!("hi {}", render_tag(1, "Alice")));
    assert_eq!(buffer.plain_text(), format!("hi Alice{}", ZERO_WIDTH_JOINER));
  }

  #[test]
  fn typing_after_a_tag_lands_outside_the_element() {
    let mut buffer = MarkupBuffer::from_markup(&render_tag(1, "Alice"));
    buffer.insert_text("!");
    assert_eq!(buffer.markup(), format!("{}!", render_tag(1, "Alice")));
  }

  #[test]
  fn backspace_removes_one_plain_char() {
    let mut buffer = MarkupBuffer::new();
    buffer.insert_text("ab");
    buffer.delete_backward();
    assert_eq!(buffer.plain_text(), "a");
    assert_eq!(buffer.plain_caret(), Some(1));
  }

  #[test]
  fn marker_roundtrip_leaves_markup_untouched() {
    let mut buffer = MarkupBuffer::from_markup("abc");
    buffer.set_plain_caret(2);
    assert!(buffer.insert_marker_at_caret('\u{0001}'));
    assert_eq!(buffer.markup().chars().position(|c| c == '\u{0001}'), Some(2));
    buffer.remove_marker('\u{0001}');
    assert_eq!(buffer.markup(), "abc");
  }

  #[test]
  fn tag_queries_use_plain_offsets() {
    let buffer = MarkupBuffer::from_markup(&format!("hi {}", render_tag(4, "Bob")));
    let tag = buffer.tag_at(4).expect("inside the tag");
    assert_eq!(tag.id, 4);
    assert!(buffer.tag_at(0).is_none());
  }

  #[test]
  fn removing_a_tag_is_atomic() {
    let mut buffer = MarkupBuffer::from_markup(&format!("hi {}x", render_tag(4, "Bob")));
    let tag = buffer.tag_at(3).expect("tag present");
    buffer.remove_tag(&tag);
    assert_eq!(buffer.plain_text(), format!("hi {}x", ZERO_WIDTH_JOINER));
    assert_eq!(buffer.plain_caret(), Some(3));
  }

  #[test]
  fn empty_surface_reports_degenerate_caret_rect() {
    let buffer = MarkupBuffer::new();
    assert_eq!(buffer.caret_rect(), Some(Rect::ZERO));
  }

  #[test]
  fn caret_rect_tracks_row_and_column() {
    let mut buffer = MarkupBuffer::new();
    buffer.insert_text("ab\ncd");
    let rect = buffer.caret_rect().expect("caret present");
    let metrics = BufferMetrics::default();
    assert_eq!(rect.top, metrics.bounding.top + metrics.line_height);
    assert_eq!(rect.left, metrics.bounding.left + 2.0 * metrics.char_width);
  }

  #[test]
  fn legacy_fallback_still_reports_the_caret() {
    let mut buffer = MarkupBuffer::new().without_native_selection();
    buffer.insert_text("abc");
    assert_eq!(buffer.plain_caret(), None);
    assert_eq!(buffer.plain_caret_legacy(), Some(3));
  }
}
