use std::{
  fs,
  time::Duration,
};

use anyhow::{
  Context as _,
  Result,
};
use clap::Parser;
use tagline_core::{
  Candidate,
  CandidateSource,
  Key,
  KeyOutcome,
  Lookup,
  LookupError,
  MarkupBuffer,
  MentionConfig,
  MentionController,
  MentionEvent,
  OverlayHandle,
  OverlayPresenter,
  StaticPool,
  Surface,
  SuggestionOverlay,
  anchor::Point,
  filter,
};
use tagline_event::TaskHandle;
use tokio::sync::mpsc;

use crate::cli::{
  Cli,
  Step,
};

mod cli;

/// Pool used when no --pool file is given.
const BUILTIN_NAMES: &[&str] = &[
  "Alice", "Alicia", "Amanda", "Bob", "Carol", "Dmitri", "Malia", "Oscar",
];

fn setup_logging(verbosity: u8) -> Result<()> {
  let level = match verbosity {
    0 => log::LevelFilter::Warn,
    1 => log::LevelFilter::Info,
    2 => log::LevelFilter::Debug,
    _ => log::LevelFilter::Trace,
  };
  fern::Dispatch::new()
    .level(level)
    .format(|out, message, record| {
      out.finish(format_args!(
        "{} {} [{}] {}",
        chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
        record.target(),
        record.level(),
        message
      ))
    })
    .chain(std::io::stderr())
    .apply()
    .context("failed to install logger")
}

/// Prints overlay state to stdout; stands in for the visual layer.
struct ConsolePresenter;

struct ConsoleOverlay;

impl OverlayPresenter for ConsolePresenter {
  type Handle = ConsoleOverlay;

  fn present(&mut self, position: Point) -> ConsoleOverlay {
    println!("-- menu opened at top={} left={}", position.top, position.left);
    ConsoleOverlay
  }
}

impl OverlayHandle for ConsoleOverlay {
  fn render(&mut self, overlay: &SuggestionOverlay) {
    if overlay.is_loading() {
      println!("   [loading...]");
      return;
    }
    if let Some(error) = overlay.load_error() {
      println!("   [{error}]");
      return;
    }
    if overlay.choices().is_empty() {
      println!("   [no matches]");
      return;
    }
    let active = overlay.active_index();
    for index in overlay.visible_range() {
      let marker = if Some(index) == active { '>' } else { ' ' };
      println!("   {marker} {}", overlay.choices()[index].name);
    }
  }
}

impl Drop for ConsoleOverlay {
  fn drop(&mut self) {
    println!("-- menu closed");
  }
}

type Resolution = (TaskHandle, Result<Vec<Candidate>, LookupError>);

/// Resolves lookups on a tokio timer, exercising the deferred path and the
/// staleness guard end to end.
struct DelayedPool {
  pool:  Vec<Candidate>,
  delay: Duration,
  tx:    mpsc::UnboundedSender<Resolution>,
}

impl CandidateSource for DelayedPool {
  fn find(&mut self, query: &str, limit: usize, handle: TaskHandle) -> Lookup {
    let choices = filter::filter(&self.pool, query, limit);
    let tx = self.tx.clone();
    let delay = self.delay;
    tokio::spawn(async move {
      tokio::time::sleep(delay).await;
      let _ = tx.send((handle, Ok(choices)));
    });
    Lookup::Pending
  }
}

fn load_pool(cli: &Cli) -> Result<Vec<Candidate>> {
  match &cli.pool {
    Some(path) => {
      let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read pool file {}", path.display()))?;
      serde_json::from_str(&text).context("pool file must be a JSON array of candidates")
    },
    None => Ok(BUILTIN_NAMES.iter().map(|name| Candidate::new(*name)).collect()),
  }
}

fn load_config(cli: &Cli) -> Result<MentionConfig> {
  match &cli.config {
    Some(path) => {
      let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
      Ok(MentionConfig::from_toml(&text)?)
    },
    None => Ok(MentionConfig::default()),
  }
}

fn report(event: &MentionEvent) {
  match event {
    MentionEvent::MenuShown => println!("event: menu shown"),
    MentionEvent::MenuHidden => println!("event: menu hidden"),
    MentionEvent::ChoiceSelected(insertion) => {
      println!(
        "event: chose {:?} at [{}, {})",
        insertion.candidate.name, insertion.start, insertion.end
      );
    },
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  setup_logging(cli.verbose)?;

  let steps = cli::parse_script(&cli.script)?;
  let pool = load_pool(&cli)?;
  let config = load_config(&cli)?;

  let (events_tx, mut events) = mpsc::channel(64);
  let (resolutions_tx, mut resolutions) = mpsc::unbounded_channel();

  let delay = cli.delay_ms.map(Duration::from_millis);
  let source: Box<dyn CandidateSource> = match delay {
    Some(delay) => {
      Box::new(DelayedPool {
        pool,
        delay,
        tx: resolutions_tx,
      })
    },
    None => Box::new(StaticPool::new(pool)),
  };

  let mut buffer = MarkupBuffer::new();
  let mut controller = MentionController::new(config, source, ConsolePresenter, events_tx);

  for step in steps {
    log::debug!("step: {step:?}");
    match step {
      Step::Type(c) => {
        if controller.on_key(&mut buffer, Key::Char(c)) == KeyOutcome::Passed {
          buffer.insert_text(&c.to_string());
          controller.on_input(&mut buffer);
        }
      },
      Step::Down => {
        controller.on_key(&mut buffer, Key::ArrowDown);
      },
      Step::Up => {
        controller.on_key(&mut buffer, Key::ArrowUp);
      },
      Step::Enter => {
        if controller.on_key(&mut buffer, Key::Enter) == KeyOutcome::Passed {
          buffer.insert_text("\n");
          controller.on_input(&mut buffer);
        }
      },
      Step::Backspace => {
        if controller.on_key(&mut buffer, Key::Backspace) == KeyOutcome::Passed {
          buffer.delete_backward();
          controller.on_input(&mut buffer);
        }
      },
      Step::Delete => {
        if controller.on_key(&mut buffer, Key::Delete) == KeyOutcome::Passed {
          buffer.delete_forward();
          controller.on_input(&mut buffer);
        }
      },
      Step::Blur => controller.on_blur(&mut buffer),
      Step::Click(offset) => {
        buffer.set_plain_caret(offset);
        controller.on_click(&mut buffer, offset);
      },
    }

    // deliver lookups that resolved while the "user" was typing
    while let Ok((handle, result)) = resolutions.try_recv() {
      controller.resolve_lookup(&handle, result);
    }
    while let Ok(event) = events.try_recv() {
      report(&event);
    }
  }

  // let the last deferred lookup land before tearing down
  if let Some(delay) = delay {
    tokio::time::sleep(delay + Duration::from_millis(20)).await;
    while let Ok((handle, result)) = resolutions.try_recv() {
      controller.resolve_lookup(&handle, result);
    }
  }
  controller.dispose();
  while let Ok(event) = events.try_recv() {
    report(&event);
  }

  println!("markup: {}", buffer.markup());
  println!("plain:  {}", buffer.plain_text().replace('\u{200D}', "<zwj>"));
  Ok(())
}
