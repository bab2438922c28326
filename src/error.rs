use std::io;
use std::path::PathBuf;

// Error handling for LCU discovery and requests

#[derive(Debug, thiserror::Error)]
pub enum LcuError {
  #[error("failed to read lockfile {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
  #[error("malformed lockfile: expected 5 fields, found {0}")]
  MalformedLockfile(usize),
  #[error("invalid port in lockfile: {0:?}")]
  InvalidPort(String),
  #[error("transport error: {0}")]
  Transport(String),
  #[error("failed to decode response: {0}")]
  Decode(#[from] serde_json::Error),
  #[error("configuration error: {0}")]
  Config(String),
}

impl LcuError {
  /// True for failures that say nothing answered at the current endpoint
  /// (refused, timed out, TLS handshake). Only these invalidate the session.
  pub fn is_network(&self) -> bool {
    matches!(self, Self::Transport(_))
  }
}

impl From<reqwest::Error> for LcuError {
  fn from(err: reqwest::Error) -> Self {
    Self::Transport(err.to_string())
  }
}

pub type Result<T> = std::result::Result<T, LcuError>;
