//! Settings for the auto-accept service.
//!
//! Resolved from, in order:
//!
//! 1. a JSON file given with `--config <path>`
//! 2. a JSON file named by the `LCU_AUTOACCEPT_CONFIG` environment variable
//! 3. built-in defaults
//!
//! Command-line flags are applied on top of whichever source was used.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::error::{LcuError, Result};

pub const CONFIG_ENV_VAR: &str = "LCU_AUTOACCEPT_CONFIG";

/// Command-line arguments parsed by `clap`.
#[derive(Parser, Debug, Default)]
#[command(name = "lcu-autoaccept", version, about = "Automatically accept League of Legends ready checks")]
pub struct Cli {
  /// Path to a JSON settings file
  #[arg(long)]
  pub config: Option<PathBuf>,

  /// League of Legends install directory, searched for the lockfile first
  #[arg(long)]
  pub league_path: Option<PathBuf>,

  /// Seconds to wait after a match is found before accepting it
  #[arg(long)]
  pub accept_delay: Option<u64>,

  /// Log filter, e.g. `info` or `lcu_autoaccept=debug` (RUST_LOG wins when set)
  #[arg(long, default_value = "info")]
  pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
  pub league_path: Option<PathBuf>,
  pub request_timeout_ms: u64,
  pub poll_interval_ms: u64,
  pub reconnect_interval_ms: u64,
  pub accept_cooldown_ms: u64,
  pub error_backoff_ms: u64,
  pub accept_delay_secs: u64,
  /// Directory for the live log file; no file logging when unset.
  pub log_dir: Option<PathBuf>,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      league_path: None,
      request_timeout_ms: 2000,
      poll_interval_ms: 1000,
      reconnect_interval_ms: 2000,
      accept_cooldown_ms: 3000,
      error_backoff_ms: 2000,
      accept_delay_secs: 0,
      log_dir: None,
    }
  }
}

impl Settings {
  pub fn load(cli: &Cli) -> Result<Self> {
    let mut settings = match &cli.config {
      Some(path) => Self::from_file(path)?,
      None => match std::env::var(CONFIG_ENV_VAR) {
        Ok(path) if !path.is_empty() => Self::from_file(Path::new(&path))?,
        _ => Self::default(),
      },
    };
    settings.apply_cli(cli);
    Ok(settings)
  }

  pub fn from_file(path: &Path) -> Result<Self> {
    let content = std::fs::read_to_string(path)
      .map_err(|e| LcuError::Config(format!("failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&content)
      .map_err(|e| LcuError::Config(format!("failed to parse {}: {}", path.display(), e)))
  }

  pub fn apply_cli(&mut self, cli: &Cli) {
    if let Some(path) = &cli.league_path {
      self.league_path = Some(path.clone());
    }
    if let Some(delay) = cli.accept_delay {
      self.accept_delay_secs = delay;
    }
  }

  pub fn request_timeout(&self) -> Duration {
    Duration::from_millis(self.request_timeout_ms)
  }

  pub fn poll_interval(&self) -> Duration {
    Duration::from_millis(self.poll_interval_ms)
  }

  pub fn reconnect_interval(&self) -> Duration {
    Duration::from_millis(self.reconnect_interval_ms)
  }

  pub fn accept_cooldown(&self) -> Duration {
    Duration::from_millis(self.accept_cooldown_ms)
  }

  pub fn error_backoff(&self) -> Duration {
    Duration::from_millis(self.error_backoff_ms)
  }

  pub fn accept_delay(&self) -> Duration {
    Duration::from_secs(self.accept_delay_secs)
  }
}
