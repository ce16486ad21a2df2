//! The serialized inline-tag format and its offset arithmetic.
//!
//! A surface's markup is plain text interleaved with rendered tag nodes of
//! the form `<span class='name' id='spanN'>NAME</span>` followed by a
//! zero-width joiner. Two offset systems coexist: plain-text offsets (tag
//! syntax invisible, inner text and the joiner count) and markup offsets
//! (every serialized char counts). Everything here is char-indexed and pure;
//! [`crate::buffer::MarkupBuffer`] owns the mutable side.

use std::ops::Range;

/// Inserted after every tag node so the caret has a landing spot that is not
/// inside the tag element.
pub const ZERO_WIDTH_JOINER: char = '\u{200D}';

const OPEN_PREFIX: &str = "<span class='name' id='span";
const OPEN_SUFFIX: &str = "'>";
const CLOSE: &str = "</span>";

/// Render the tag node for an accepted candidate, joiner included.
pub fn render_tag(id: u64, name: &str) -> String {
  format!("<span class='name' id='span{}'>{}</span>{}", id, name, ZERO_WIDTH_JOINER)
}

/// A tag node located in a markup string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSpan {
  pub id:           u64,
  /// Char range of the whole element in the serialized markup.
  pub markup_range: Range<usize>,
  /// Char range of the display text in the plain-text projection.
  pub plain_range:  Range<usize>,
  pub text:         String,
}

enum Token {
  Char(char),
  Tag {
    id:         u64,
    text:       String,
    open_len:   usize,
    markup_len: usize,
  },
}

fn tokenize(markup: &str) -> Vec<Token> {
  let chars: Vec<char> = markup.chars().collect();
  let mut tokens = Vec::new();
  let mut i = 0;
  while i < chars.len() {
    match parse_tag(&chars[i..]) {
      Some((token, len)) => {
        tokens.push(token);
        i += len;
      },
      None => {
        tokens.push(Token::Char(chars[i]));
        i += 1;
      },
    }
  }
  tokens
}

/// Parse a tag node at the head of `chars`. Anything that does not fully
/// match the format (including an unterminated element) is treated as
/// literal text by the caller.
fn parse_tag(chars: &[char]) -> Option<(Token, usize)> {
  let mut i = eat(chars, 0, OPEN_PREFIX)?;
  let digits_start = i;
  while i < chars.len() && chars[i].is_ascii_digit() {
    i += 1;
  }
  let id: u64 = chars[digits_start..i].iter().collect::<String>().parse().ok()?;
  i = eat(chars, i, OPEN_SUFFIX)?;
  let open_len = i;
  let text_start = i;
  while i < chars.len() && eat(chars, i, CLOSE).is_none() {
    i += 1;
  }
  let close_end = eat(chars, i, CLOSE)?;
  let text: String = chars[text_start..i].iter().collect();
  Some((
    Token::Tag {
      id,
      text,
      open_len,
      markup_len: close_end,
    },
    close_end,
  ))
}

/// Match `literal` at char position `at`, returning the position just past it.
fn eat(chars: &[char], at: usize, literal: &str) -> Option<usize> {
  let mut i = at;
  for expected in literal.chars() {
    if chars.get(i) != Some(&expected) {
      return None;
    }
    i += 1;
  }
  Some(i)
}

/// Every tag node in `markup`, in document order.
pub fn tag_spans(markup: &str) -> Vec<TagSpan> {
  let mut spans = Vec::new();
  let (mut markup_at, mut plain_at) = (0usize, 0usize);
  for token in tokenize(markup) {
    match token {
      Token::Char(_) => {
        markup_at += 1;
        plain_at += 1;
      },
      Token::Tag {
        id,
        text,
        markup_len,
        ..
      } => {
        let plain_len = text.chars().count();
        spans.push(TagSpan {
          id,
          markup_range: markup_at..markup_at + markup_len,
          plain_range: plain_at..plain_at + plain_len,
          text,
        });
        markup_at += markup_len;
        plain_at += plain_len;
      },
    }
  }
  spans
}

/// The plain-text projection: tag syntax stripped, inner text kept.
pub fn plain_text_of(markup: &str) -> String {
  let mut plain = String::new();
  for token in tokenize(markup) {
    match token {
      Token::Char(c) => plain.push(c),
      Token::Tag { text, .. } => plain.push_str(&text),
    }
  }
  plain
}

/// Map a plain-text offset to the corresponding markup offset.
///
/// An offset on a tag boundary resolves to the position before the element,
/// so insertions at a boundary land outside the tag. Offsets past the end of
/// the plain text map to the end of the markup.
pub fn plain_to_markup(markup: &str, offset: usize) -> usize {
  let (mut markup_at, mut plain_at) = (0usize, 0usize);
  for token in tokenize(markup) {
    match token {
      Token::Char(_) => {
        if plain_at == offset {
          return markup_at;
        }
        markup_at += 1;
        plain_at += 1;
      },
      Token::Tag {
        text,
        open_len,
        markup_len,
        ..
      } => {
        if plain_at == offset {
          return markup_at;
        }
        let plain_len = text.chars().count();
        if offset < plain_at + plain_len {
          return markup_at + open_len + (offset - plain_at);
        }
        markup_at += markup_len;
        plain_at += plain_len;
      },
    }
  }
  markup_at
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn renders_tag_with_joiner() {
    let tag = render_tag(3, "Alice");
    assert_eq!(tag, format!("<span class='name' id='span3'>Alice</span>{}", ZERO_WIDTH_JOINER));
  }

  #[test]
  fn finds_tag_spans() {
    let markup = format!("hi {} there", render_tag(1, "Bob"));
    let spans = tag_spans(&markup);
    assert_eq!(spans.len(), 1);
    let span = &spans[0];
    assert_eq!(span.id, 1);
    assert_eq!(span.text, "Bob");
    // "hi " precedes the tag in both systems
    assert_eq!(span.plain_range, 3..6);
    assert_eq!(span.markup_range.start, 3);
    let element: String = markup
      .chars()
      .skip(span.markup_range.start)
      .take(span.markup_range.end - span.markup_range.start)
      .collect();
    assert_eq!(element, "<span class='name' id='span1'>Bob</span>");
  }

  #[test]
  fn strips_tags_to_plain_text() {
    let markup = format!("hi {}!", render_tag(2, "Alice"));
    assert_eq!(plain_text_of(&markup), format!("hi Alice{}!", ZERO_WIDTH_JOINER));
  }

  #[test]
  fn plain_text_keeps_unrecognized_angle_brackets() {
    assert_eq!(plain_text_of("a < b <span>c"), "a < b <span>c");
  }

  #[test]
  fn maps_offsets_around_a_tag() {
    let markup = format!("ab{}cd", render_tag(1, "Eve"));
    // before the tag
    assert_eq!(plain_to_markup(&markup, 0), 0);
    assert_eq!(plain_to_markup(&markup, 1), 1);
    // boundary resolves before the element
    assert_eq!(plain_to_markup(&markup, 2), 2);
    // inside the tag's text
    let open_len = "<span class='name' id='span1'>".chars().count();
    assert_eq!(plain_to_markup(&markup, 3), 2 + open_len + 1);
    // after the joiner: plain "abEve\u{200D}cd", offset 6 is 'c'
    let element_len = "<span class='name' id='span1'>Eve</span>".chars().count();
    assert_eq!(plain_to_markup(&markup, 6), 2 + element_len + 1);
  }

  #[test]
  fn offsets_past_the_end_map_to_markup_end() {
    let markup = "abc".to_string();
    assert_eq!(plain_to_markup(&markup, 10), 3);
  }

  #[test]
  fn unterminated_tag_is_literal_text() {
    let markup = "<span class='name' id='span1'>oops";
    assert!(tag_spans(markup).is_empty());
    assert_eq!(plain_text_of(markup), markup);
  }
}
