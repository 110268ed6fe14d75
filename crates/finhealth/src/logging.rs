//! Console output for the finhealth CLI.
//!
//! User-facing lines go to stderr with a short colored tag, so stdout stays
//! clean for `--json` output. Library diagnostics go through `tracing`;
//! [`init_tracing`] wires them to the same stream.

use chrono::Local;
use colored::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
  Info,
  Warn,
  Error,
  Debug,
  Success,
}

impl Level {
  fn tag(self) -> &'static str {
    match self {
      Level::Info => "info",
      Level::Warn => "warn",
      Level::Error => "error",
      Level::Debug => "debug",
      Level::Success => "sccs",
    }
  }

  fn color(self) -> Color {
    match self {
      Level::Info => Color::Blue,
      Level::Warn => Color::Yellow,
      Level::Error => Color::Red,
      Level::Debug => Color::Magenta,
      Level::Success => Color::Green,
    }
  }
}

/// Install the tracing subscriber. `RUST_LOG` wins when set.
pub fn init_tracing(verbose: bool) {
  let fallback = if verbose { "finhealth=debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

  // A second init (tests, embedding) keeps the first subscriber.
  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .try_init();
}

fn prefix(level: Level) -> String {
  let tag = level.tag();
  format!("[{}]{:<width$}", tag.color(level.color()).bold(), "", width = 7 - tag.len() - 2)
}

/// Write every line of `message` with the level's prefix.
pub fn emit(level: Level, message: &str) {
  let prefix = prefix(level);
  for line in message.lines() {
    eprintln!("{prefix} {line}");
  }
}

pub fn info(message: &str) {
  emit(Level::Info, message);
}

pub fn warn(message: &str) {
  emit(Level::Warn, message);
}

pub fn error(message: &str) {
  emit(Level::Error, message);
}

pub fn debug(message: &str) {
  emit(Level::Debug, message);
}

pub fn success(message: &str) {
  emit(Level::Success, message);
}

/// Timestamped line for workflow transitions.
pub fn event(level: Level, message: &str) {
  let timestamp = Local::now().format("%H:%M:%S").to_string();
  let prefix = format!("[{}] [{}]", "event".color(level.color()).bold(), timestamp.cyan());
  for line in message.lines() {
    eprintln!("{prefix} {line}");
  }
}

pub fn rule(width: usize, ch: char) -> String {
  ch.to_string().repeat(width)
}
