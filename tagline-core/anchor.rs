//! Overlay anchoring near the caret.
//!
//! The overlay is dropped one line below the caret's selection rectangle.
//! Host selection APIs report a zero coordinate for a collapsed caret in
//! some states (an empty line start is the usual one), so each axis falls
//! back independently to the surface's own bounding box. The position is
//! derived once per menu open; it does not follow the caret while typing.

/// Screen position for the overlay's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
  pub top:  f32,
  pub left: f32,
}

/// Axis-aligned rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
  pub top:    f32,
  pub left:   f32,
  pub width:  f32,
  pub height: f32,
}

impl Rect {
  pub const ZERO: Rect = Rect {
    top:    0.0,
    left:   0.0,
    width:  0.0,
    height: 0.0,
  };
}

/// Compute the overlay position from the caret rectangle, the surface's
/// bounding box and its line height. A missing rectangle counts as fully
/// degenerate.
pub fn anchor_overlay(caret: Option<Rect>, surface: Rect, line_height: f32) -> Point {
  let caret = caret.unwrap_or(Rect::ZERO);
  let top = if caret.top == 0.0 {
    surface.top + line_height
  } else {
    caret.top + line_height
  };
  let left = if caret.left == 0.0 {
    surface.left
  } else {
    caret.left
  };
  Point { top, left }
}

#[cfg(test)]
mod test {
  use super::*;

  const SURFACE: Rect = Rect {
    top:    40.0,
    left:   20.0,
    width:  400.0,
    height: 120.0,
  };

  #[test]
  fn anchors_one_line_below_the_caret() {
    let caret = Rect {
      top:    58.0,
      left:   96.0,
      width:  0.0,
      height: 16.0,
    };
    let position = anchor_overlay(Some(caret), SURFACE, 16.0);
    assert_eq!(position, Point {
      top:  74.0,
      left: 96.0,
    });
  }

  #[test]
  fn degenerate_rect_falls_back_to_the_surface() {
    let position = anchor_overlay(Some(Rect::ZERO), SURFACE, 16.0);
    assert_eq!(position, Point {
      top:  56.0,
      left: 20.0,
    });
  }

  #[test]
  fn missing_rect_counts_as_degenerate() {
    let position = anchor_overlay(None, SURFACE, 16.0);
    assert_eq!(position, Point {
      top:  56.0,
      left: 20.0,
    });
  }

  #[test]
  fn axes_fall_back_independently() {
    let caret = Rect {
      top:    58.0,
      left:   0.0,
      width:  0.0,
      height: 16.0,
    };
    let position = anchor_overlay(Some(caret), SURFACE, 16.0);
    assert_eq!(position, Point {
      top:  74.0,
      left: 20.0,
    });
  }
}
