// Poll loop that watches for ready checks and accepts them

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use super::types::{ServiceState, Status, StatusListener};
use crate::config::Settings;
use crate::lcu::{LcuClient, Outcome, ReadyCheck};

/// The slice of the client API the poll loop needs.
pub trait MatchmakingApi {
  fn check_connection(&mut self) -> bool;
  fn fetch_ready_check(&mut self) -> Outcome<ReadyCheck>;
  fn accept_match(&mut self) -> Outcome<()>;
}

impl MatchmakingApi for LcuClient {
  fn check_connection(&mut self) -> bool {
    self.is_connected()
  }

  fn fetch_ready_check(&mut self) -> Outcome<ReadyCheck> {
    self.ready_check()
  }

  fn accept_match(&mut self) -> Outcome<()> {
    self.accept_ready_check()
  }
}

pub trait Sleeper {
  fn sleep(&self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
  fn sleep(&self, duration: Duration) {
    thread::sleep(duration);
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
  pub poll_interval: Duration,
  pub reconnect_interval: Duration,
  pub accept_cooldown: Duration,
  pub error_backoff: Duration,
  pub accept_delay: Duration,
}

impl Default for Timings {
  fn default() -> Self {
    Self::from(&Settings::default())
  }
}

impl From<&Settings> for Timings {
  fn from(settings: &Settings) -> Self {
    Self {
      poll_interval: settings.poll_interval(),
      reconnect_interval: settings.reconnect_interval(),
      accept_cooldown: settings.accept_cooldown(),
      error_backoff: settings.error_backoff(),
      accept_delay: settings.accept_delay(),
    }
  }
}

/// Cheap, cloneable view of a service for other threads: read the status,
/// or ask the loop to stop.
#[derive(Clone)]
pub struct ServiceHandle {
  state: Arc<ServiceState>,
}

impl ServiceHandle {
  /// Idempotent. The loop exits once its current sleep finishes; called
  /// before `start()`, it makes that `start()` return straight away.
  pub fn stop(&self) {
    let was_running = self.state.request_stop();
    self.state.set_status(Status::Stopped);
    if was_running {
      info!("auto-accept service stopped");
    }
  }

  pub fn status(&self) -> Status {
    self.state.status()
  }

  pub fn get_status(&self) -> String {
    self.state.status().to_string()
  }

  pub fn is_running(&self) -> bool {
    self.state.is_running()
  }

  pub fn is_match_found(&self) -> bool {
    self.state.is_match_found()
  }

  pub fn last_accepted(&self) -> Option<DateTime<Utc>> {
    self.state.last_accepted()
  }

  /// Called with every status write, from the thread doing the write.
  pub fn on_status<F>(&self, listener: F)
  where
    F: Fn(Status) + Send + Sync + 'static,
  {
    let listener: StatusListener = Arc::new(listener);
    self.state.add_listener(listener);
  }
}

pub struct AutoAcceptService<C = LcuClient, S = ThreadSleeper> {
  client: C,
  sleeper: S,
  timings: Timings,
  state: Arc<ServiceState>,
}

impl AutoAcceptService<LcuClient, ThreadSleeper> {
  pub fn from_settings(client: LcuClient, settings: &Settings) -> Self {
    Self::new(client, ThreadSleeper, Timings::from(settings))
  }
}

impl<C: MatchmakingApi, S: Sleeper> AutoAcceptService<C, S> {
  pub fn new(client: C, sleeper: S, timings: Timings) -> Self {
    Self {
      client,
      sleeper,
      timings,
      state: Arc::new(ServiceState::default()),
    }
  }

  pub fn handle(&self) -> ServiceHandle {
    ServiceHandle {
      state: Arc::clone(&self.state),
    }
  }

  pub fn client(&self) -> &C {
    &self.client
  }

  /// Runs the poll loop on the calling thread until `stop()` is called.
  pub fn start(&mut self) {
    if self.state.take_pending_stop() {
      info!("stop requested before start, not starting");
      return;
    }

    self.state.set_status(Status::Starting);
    if !self.state.begin_run() {
      // stop() landed between the two checks; Starting may have overwritten it
      self.state.take_pending_stop();
      self.state.set_status(Status::Stopped);
      info!("stop requested before start, not starting");
      return;
    }
    info!(
      poll_ms = self.timings.poll_interval.as_millis() as u64,
      accept_delay_s = self.timings.accept_delay.as_secs(),
      "auto-accept service started"
    );

    while self.state.is_running() {
      let result = panic::catch_unwind(AssertUnwindSafe(|| self.poll_once()));
      if let Err(payload) = result {
        error!(error = %panic_message(payload.as_ref()), "error in auto-accept loop");
        self.sleeper.sleep(self.timings.error_backoff);
      }
    }
    self.state.end_run();
  }

  pub fn stop(&self) {
    self.handle().stop();
  }

  pub fn get_status(&self) -> String {
    self.state.status().to_string()
  }

  pub fn is_running(&self) -> bool {
    self.state.is_running()
  }

  pub fn is_match_found(&self) -> bool {
    self.state.is_match_found()
  }

  fn poll_once(&mut self) {
    if !self.client.check_connection() {
      self.report(Status::WaitingForClient);
      self.state.set_match_found(false);
      self.sleeper.sleep(self.timings.reconnect_interval);
      return;
    }

    self.report(Status::ConnectedWaiting);

    let match_found = match self.client.fetch_ready_check() {
      Outcome::Found(ready_check) => ready_check.is_in_progress(),
      Outcome::NotFound => false,
      Outcome::Failed(e) => {
        warn!(error = %e, "error checking ready check");
        false
      }
    };
    self.state.set_match_found(match_found);

    if match_found {
      self.handle_match_found();
    }

    self.sleeper.sleep(self.timings.poll_interval);
  }

  fn handle_match_found(&mut self) {
    self.report(Status::MatchFound);

    if !self.timings.accept_delay.is_zero() {
      info!(delay_s = self.timings.accept_delay.as_secs(), "match found, waiting before accepting");
      self.sleeper.sleep(self.timings.accept_delay);
      if !self.state.is_running() {
        return;
      }
    } else {
      info!("match found, accepting");
    }

    match self.client.accept_match() {
      Outcome::Found(()) => {
        self.report(Status::Accepted);
        self.state.mark_accepted();
        self.state.set_match_found(false);
        info!("match accepted");
        // Let the client leave the ready check before polling it again
        self.sleeper.sleep(self.timings.accept_cooldown);
      }
      Outcome::NotFound => {
        self.report(Status::AcceptFailed);
        warn!("failed to accept match");
      }
      Outcome::Failed(e) => {
        self.report(Status::AcceptFailed);
        warn!(error = %e, "failed to accept match");
      }
    }
  }

  // Once stop() has published Stopped, late writes from this iteration are dropped
  fn report(&self, status: Status) {
    self.state.publish(status);
  }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
  if let Some(msg) = payload.downcast_ref::<&str>() {
    (*msg).to_string()
  } else if let Some(msg) = payload.downcast_ref::<String>() {
    msg.clone()
  } else {
    "unknown panic".to_string()
  }
}
