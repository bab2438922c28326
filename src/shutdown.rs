// Interrupt handling for the blocking poll loop

use std::future::Future;
use std::io;
use std::thread::{self, JoinHandle};

use tracing::{info, warn};

use crate::auto_accept::ServiceHandle;

/// Stops the service on Ctrl-C. Safe to call before `start()`: an interrupt
/// that arrives first cancels the run.
pub fn watch_ctrl_c(handle: ServiceHandle) -> io::Result<JoinHandle<()>> {
  watch_signal(handle, || async { tokio::signal::ctrl_c().await })
}

/// Runs `signal` on a current-thread runtime in a side thread and calls
/// `stop()` once it resolves.
pub fn watch_signal<F, Fut>(handle: ServiceHandle, signal: F) -> io::Result<JoinHandle<()>>
where
  F: FnOnce() -> Fut + Send + 'static,
  Fut: Future<Output = io::Result<()>>,
{
  let runtime = tokio::runtime::Builder::new_current_thread()
    .enable_all()
    .build()?;

  thread::Builder::new()
    .name("interrupt-watcher".to_string())
    .spawn(move || {
      runtime.block_on(async move {
        match signal().await {
          Ok(()) => {
            info!("interrupt received, shutting down");
            handle.stop();
          }
          Err(e) => warn!(error = %e, "failed to listen for interrupt"),
        }
      });
    })
}
