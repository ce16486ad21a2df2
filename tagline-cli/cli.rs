use std::path::PathBuf;

use clap::{
  ArgAction,
  Parser,
};

/// Scripted mention-autocomplete demo.
///
/// The script is typed into an in-memory surface one keystroke at a time.
/// Braced tokens drive non-character keys: `{down}`, `{up}`, `{enter}`,
/// `{bs}`, `{del}`, `{blur}` and `{click:N}` (caret to plain offset N).
#[derive(Debug, Parser)]
#[command(name = "tagline", about, version)]
pub struct Cli {
  /// Editing script, e.g. "hi @ali{down}{enter}"
  #[arg(default_value = "hi @ali{enter}")]
  pub script: String,

  /// JSON file with the candidate pool (array of {"name", "id"?} records)
  #[arg(long, value_name = "FILE")]
  pub pool: Option<PathBuf>,

  /// TOML file with engine configuration
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Resolve candidate lookups asynchronously after this many milliseconds
  #[arg(long, value_name = "MS")]
  pub delay_ms: Option<u64>,

  /// Increase log verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = ArgAction::Count)]
  pub verbose: u8,
}

/// One scripted surface interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
  Type(char),
  Down,
  Up,
  Enter,
  Backspace,
  Delete,
  Blur,
  Click(usize),
}

pub fn parse_script(script: &str) -> anyhow::Result<Vec<Step>> {
  let mut steps = Vec::new();
  let mut chars = script.chars();
  while let Some(c) = chars.next() {
    if c != '{' {
      steps.push(Step::Type(c));
      continue;
    }
    let mut token = String::new();
    for c in chars.by_ref() {
      if c == '}' {
        break;
      }
      token.push(c);
    }
    let step = match token.as_str() {
      "down" => Step::Down,
      "up" => Step::Up,
      "enter" => Step::Enter,
      "bs" => Step::Backspace,
      "del" => Step::Delete,
      "blur" => Step::Blur,
      other => match other.strip_prefix("click:") {
        Some(offset) => Step::Click(offset.parse()?),
        None => anyhow::bail!("unknown script token `{{{other}}}`"),
      },
    };
    steps.push(step);
  }
  Ok(steps)
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn parses_text_and_tokens() {
    let steps = parse_script("a{down}{click:3}").unwrap();
    assert_eq!(steps, [Step::Type('a'), Step::Down, Step::Click(3)]);
  }

  #[test]
  fn rejects_unknown_tokens() {
    assert!(parse_script("{nope}").is_err());
  }
}
