//! Engine configuration.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_TRIGGER: char = '@';
pub const DEFAULT_MAX_SUGGESTIONS: usize = crate::filter::DEFAULT_LIMIT;

/// Word characters only: the in-progress search text must keep matching for
/// the session to stay open.
static WORD_PATTERN: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^\w*$").expect("default pattern compiles"));

#[derive(Debug, Clone)]
pub struct MentionConfig {
  /// Typing this character opens a suggestion session.
  pub trigger_character:  char,
  /// The in-progress search text must match this pattern; a miss closes the
  /// session. Patterns should anchor themselves.
  pub search_pattern:     Regex,
  /// Upper bound on the suggestion list length.
  pub max_suggestions:    usize,
  /// Whether clicking an inserted tag selects it.
  pub tag_focus_on_click: bool,
}

impl Default for MentionConfig {
  fn default() -> Self {
    Self {
      trigger_character:  DEFAULT_TRIGGER,
      search_pattern:     WORD_PATTERN.clone(),
      max_suggestions:    DEFAULT_MAX_SUGGESTIONS,
      tag_focus_on_click: true,
    }
  }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigRaw {
  trigger_character:  Option<String>,
  search_pattern:     Option<String>,
  max_suggestions:    Option<usize>,
  tag_focus_on_click: Option<bool>,
}

impl MentionConfig {
  pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
    let raw: ConfigRaw = toml::from_str(text)?;
    raw.try_into()
  }
}

impl TryFrom<ConfigRaw> for MentionConfig {
  type Error = ConfigError;

  fn try_from(raw: ConfigRaw) -> Result<Self, ConfigError> {
    let mut config = MentionConfig::default();
    if let Some(trigger) = raw.trigger_character {
      let mut chars = trigger.chars();
      match (chars.next(), chars.next()) {
        (Some(c), None) => config.trigger_character = c,
        _ => return Err(ConfigError::InvalidTrigger(trigger)),
      }
    }
    if let Some(pattern) = raw.search_pattern {
      config.search_pattern =
        Regex::new(&pattern).map_err(|source| ConfigError::InvalidPattern { pattern, source })?;
    }
    if let Some(limit) = raw.max_suggestions {
      config.max_suggestions = limit;
    }
    if let Some(focus) = raw.tag_focus_on_click {
      config.tag_focus_on_click = focus;
    }
    Ok(config)
  }
}
