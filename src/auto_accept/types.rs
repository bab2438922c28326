// Status values and shared state for the auto-accept service

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Status {
  Initializing = 0,
  Starting = 1,
  WaitingForClient = 2,
  ConnectedWaiting = 3,
  MatchFound = 4,
  Accepted = 5,
  AcceptFailed = 6,
  Stopped = 7,
}

impl Status {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Initializing => "Initializing...",
      Self::Starting => "Starting...",
      Self::WaitingForClient => "Waiting for League client...",
      Self::ConnectedWaiting => "Connected - Waiting for match...",
      Self::MatchFound => "Match found! Accepting...",
      Self::Accepted => "Match accepted!",
      Self::AcceptFailed => "Failed to accept match",
      Self::Stopped => "Stopped",
    }
  }

  fn from_u8(value: u8) -> Self {
    match value {
      1 => Self::Starting,
      2 => Self::WaitingForClient,
      3 => Self::ConnectedWaiting,
      4 => Self::MatchFound,
      5 => Self::Accepted,
      6 => Self::AcceptFailed,
      7 => Self::Stopped,
      _ => Self::Initializing,
    }
  }
}

impl fmt::Display for Status {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

pub type StatusListener = Arc<dyn Fn(Status) + Send + Sync>;

// Run states. STOPPING means stop() was called and the loop (or the next
// start) has not yet consumed it.
const IDLE: u8 = 0;
const RUNNING: u8 = 1;
const STOPPING: u8 = 2;

/// State shared between the poll loop and whoever hosts it.
///
/// The loop is the only writer apart from `stop()`; observers read through
/// atomics and never block the loop.
pub struct ServiceState {
  run: AtomicU8,
  status: AtomicU8,
  match_found: AtomicBool,
  // Millis since epoch, 0 = never
  last_accepted_ms: AtomicI64,
  listeners: Mutex<Vec<StatusListener>>,
}

impl Default for ServiceState {
  fn default() -> Self {
    Self {
      run: AtomicU8::new(IDLE),
      status: AtomicU8::new(Status::Initializing as u8),
      match_found: AtomicBool::new(false),
      last_accepted_ms: AtomicI64::new(0),
      listeners: Mutex::new(Vec::new()),
    }
  }
}

impl ServiceState {
  pub fn status(&self) -> Status {
    Status::from_u8(self.status.load(Ordering::SeqCst))
  }

  pub fn set_status(&self, status: Status) {
    let previous = Status::from_u8(self.status.swap(status as u8, Ordering::SeqCst));
    self.notify(previous, status);
  }

  /// Writes `status` unless `Stopped` is already published. Returns whether
  /// the write happened.
  pub(crate) fn publish(&self, status: Status) -> bool {
    let stopped = Status::Stopped as u8;
    match self
      .status
      .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
        (current != stopped).then_some(status as u8)
      }) {
      Ok(previous) => {
        self.notify(Status::from_u8(previous), status);
        true
      }
      Err(_) => {
        debug!(status = %status, "dropping status write after stop");
        false
      }
    }
  }

  fn notify(&self, previous: Status, status: Status) {
    if previous != status {
      info!(status = %status, "status changed");
    } else {
      debug!(status = %status, "status unchanged");
    }

    // Clone out so a listener may call back into the service
    let listeners: Vec<StatusListener> = match self.listeners.lock() {
      Ok(guard) => guard.clone(),
      Err(poisoned) => poisoned.into_inner().clone(),
    };
    for listener in listeners {
      listener(status);
    }
  }

  pub fn add_listener(&self, listener: StatusListener) {
    match self.listeners.lock() {
      Ok(mut guard) => guard.push(listener),
      Err(poisoned) => poisoned.into_inner().push(listener),
    }
  }

  pub fn is_running(&self) -> bool {
    self.run.load(Ordering::SeqCst) == RUNNING
  }

  /// Moves from idle to running. Fails if a stop is pending.
  pub(crate) fn begin_run(&self) -> bool {
    self
      .run
      .compare_exchange(IDLE, RUNNING, Ordering::SeqCst, Ordering::SeqCst)
      .is_ok()
  }

  /// Asks the loop to stop. A request made while idle stays pending and
  /// cancels the next start. Returns whether the loop was running.
  pub(crate) fn request_stop(&self) -> bool {
    self.run.swap(STOPPING, Ordering::SeqCst) == RUNNING
  }

  /// Consumes a pending stop, if any.
  pub(crate) fn take_pending_stop(&self) -> bool {
    self
      .run
      .compare_exchange(STOPPING, IDLE, Ordering::SeqCst, Ordering::SeqCst)
      .is_ok()
  }

  pub(crate) fn end_run(&self) {
    self.run.store(IDLE, Ordering::SeqCst);
  }

  pub fn is_match_found(&self) -> bool {
    self.match_found.load(Ordering::SeqCst)
  }

  pub(crate) fn set_match_found(&self, found: bool) {
    self.match_found.store(found, Ordering::SeqCst);
  }

  pub fn last_accepted(&self) -> Option<DateTime<Utc>> {
    match self.last_accepted_ms.load(Ordering::SeqCst) {
      0 => None,
      ms => DateTime::<Utc>::from_timestamp_millis(ms),
    }
  }

  pub(crate) fn mark_accepted(&self) {
    self
      .last_accepted_ms
      .store(Utc::now().timestamp_millis(), Ordering::SeqCst);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_round_trips_through_the_atomic() {
    let state = ServiceState::default();
    assert_eq!(state.status(), Status::Initializing);

    for status in [
      Status::Starting,
      Status::WaitingForClient,
      Status::ConnectedWaiting,
      Status::MatchFound,
      Status::Accepted,
      Status::AcceptFailed,
      Status::Stopped,
    ] {
      state.set_status(status);
      assert_eq!(state.status(), status);
    }
  }

  #[test]
  fn display_strings_are_user_facing() {
    assert_eq!(Status::WaitingForClient.to_string(), "Waiting for League client...");
    assert_eq!(Status::ConnectedWaiting.to_string(), "Connected - Waiting for match...");
    assert_eq!(Status::AcceptFailed.to_string(), "Failed to accept match");
  }

  #[test]
  fn listeners_see_every_write() {
    let state = ServiceState::default();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    state.add_listener(Arc::new(move |status: Status| sink.lock().unwrap().push(status)));

    state.set_status(Status::WaitingForClient);
    state.set_status(Status::WaitingForClient);

    assert_eq!(
      *seen.lock().unwrap(),
      vec![Status::WaitingForClient, Status::WaitingForClient]
    );
  }

  #[test]
  fn publish_never_replaces_stopped() {
    let state = ServiceState::default();
    assert!(state.publish(Status::ConnectedWaiting));
    state.set_status(Status::Stopped);

    assert!(!state.publish(Status::WaitingForClient));
    assert_eq!(state.status(), Status::Stopped);

    // A fresh start overwrites it explicitly
    state.set_status(Status::Starting);
    assert!(state.publish(Status::WaitingForClient));
    assert_eq!(state.status(), Status::WaitingForClient);
  }

  #[test]
  fn stop_while_idle_stays_pending_until_taken() {
    let state = ServiceState::default();
    assert!(!state.request_stop());
    assert!(!state.is_running());
    assert!(!state.begin_run());

    assert!(state.take_pending_stop());
    assert!(!state.take_pending_stop());
    assert!(state.begin_run());
    assert!(state.is_running());

    assert!(state.request_stop());
    assert!(!state.is_running());
    state.end_run();
    assert!(state.begin_run());
  }

  #[test]
  fn last_accepted_is_empty_until_marked() {
    let state = ServiceState::default();
    assert!(state.last_accepted().is_none());
    state.mark_accepted();
    assert!(state.last_accepted().is_some());
  }
}
