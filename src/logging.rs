// Logging setup: stderr plus an optional live log file

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub const LIVE_LOG_FILE: &str = "lcu-autoaccept-live.log";

/// Installs the global subscriber. `RUST_LOG` takes precedence over
/// `default_filter`.
///
/// Keep the returned guard alive for as long as the process logs, dropping it
/// flushes the file writer.
pub fn init(default_filter: &str, log_dir: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
  let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter))?;

  let (file_layer, guard) = match log_dir.and_then(open_live_log) {
    Some((writer, guard)) => (
      Some(fmt::layer().with_ansi(false).with_writer(writer)),
      Some(guard),
    ),
    None => (None, None),
  };

  tracing_subscriber::registry()
    .with(filter)
    .with(fmt::layer().with_writer(std::io::stderr))
    .with(file_layer)
    .try_init()?;

  Ok(guard)
}

// A log dir we can't create is not fatal, stderr still works
fn open_live_log(dir: &Path) -> Option<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
  if let Err(e) = std::fs::create_dir_all(dir) {
    eprintln!("failed to create log dir {}: {}", dir.display(), e);
    return None;
  }
  let appender = tracing_appender::rolling::never(dir, LIVE_LOG_FILE);
  Some(tracing_appender::non_blocking(appender))
}
