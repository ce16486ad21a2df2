use thiserror::Error;

/// A candidate lookup rejection. Advisory: it is recorded on the overlay for
/// the presenter to show, the session stays open and the next keystroke
/// retries with a fresh query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("candidate lookup failed: {0}")]
pub struct LookupError(pub String);

impl LookupError {
  pub fn new(message: impl Into<String>) -> Self {
    Self(message.into())
  }
}

/// The surface's selection machinery failed to produce a usable caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OffsetError {
  #[error("no selection available on the surface")]
  SelectionUnavailable,
  #[error("caret marker disappeared from the markup")]
  MarkerLost,
}

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("invalid search pattern `{pattern}`: {source}")]
  InvalidPattern {
    pattern: String,
    source:  regex::Error,
  },
  #[error("trigger must be a single character, got `{0}`")]
  InvalidTrigger(String),
  #[error("malformed config: {0}")]
  Malformed(#[from] toml::de::Error),
}
