// Connection-checked access to the League client API

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::lockfile::{self, Filesystem, Lockfile, OsFilesystem};
use super::transport::{LcuRequest, LcuResponse, Method, ReqwestTransport, Transport};
use super::types::{
  Outcome, ReadyCheck, Session, Summoner, CURRENT_SUMMONER_ENDPOINT, READY_CHECK_ACCEPT_ENDPOINT,
  READY_CHECK_ENDPOINT,
};
use crate::config::Settings;
use crate::error::Result;

pub struct LcuClient {
  fs: Box<dyn Filesystem>,
  transport: Box<dyn Transport>,
  candidates: Vec<PathBuf>,
  session: Option<Session>,
  // Identity is logged once per session
  announced: bool,
}

impl LcuClient {
  pub fn new(
    fs: Box<dyn Filesystem>,
    transport: Box<dyn Transport>,
    candidates: Vec<PathBuf>,
  ) -> Self {
    Self {
      fs,
      transport,
      candidates,
      session: None,
      announced: false,
    }
  }

  /// Client on the real filesystem and network, searching the configured
  /// League directory first and then the usual install locations.
  pub fn from_settings(settings: &Settings) -> Result<Self> {
    let dirs = lockfile::candidate_dirs(settings.league_path.as_deref(), |key| {
      std::env::var(key).ok()
    });
    let transport = ReqwestTransport::new(settings.request_timeout())?;
    Ok(Self::new(
      Box::new(OsFilesystem),
      Box::new(transport),
      lockfile::candidate_paths(&dirs),
    ))
  }

  pub fn session(&self) -> Option<&Session> {
    self.session.as_ref()
  }

  pub fn candidates(&self) -> &[PathBuf] {
    &self.candidates
  }

  pub fn locate_credential_file(&self) -> Option<PathBuf> {
    lockfile::locate(self.fs.as_ref(), &self.candidates)
  }

  /// Replaces the session with one read from `path`.
  ///
  /// On failure the session is cleared, so a stale port/password pair is
  /// never kept alongside a lockfile that no longer parses.
  pub fn load_session(&mut self, path: &Path) -> bool {
    match Lockfile::read(self.fs.as_ref(), path) {
      Ok(lockfile) => {
        debug!(path = %path.display(), port = lockfile.port, "loaded lockfile");
        self.replace_session(Some(lockfile.into_session()));
        true
      }
      Err(e) => {
        // The client rewrites the file on start, a partial read is expected now and then
        debug!(path = %path.display(), error = %e, "failed to parse lockfile");
        self.replace_session(None);
        false
      }
    }
  }

  pub fn is_connected(&mut self) -> bool {
    if self.session.is_none() {
      let Some(path) = self.locate_credential_file() else {
        debug!("no lockfile found, is League running?");
        return false;
      };
      if !self.load_session(&path) {
        return false;
      }
    }

    match self.send(Method::Get, CURRENT_SUMMONER_ENDPOINT) {
      Outcome::Found(response) if response.status == 200 => {
        if !self.announced {
          self.announced = true;
          if let (Some(session), Ok(value)) =
            (self.session.as_ref(), response.json::<serde_json::Value>())
          {
            info!(
              port = session.port(),
              summoner = %Summoner::from_value(&value).name(),
              "connected to League client"
            );
          }
        }
        true
      }
      Outcome::Found(response) if response.status == 401 => {
        // Port was taken over by a newer client with a different password
        debug!("lockfile credentials rejected, dropping session");
        self.replace_session(None);
        false
      }
      Outcome::Found(response) => {
        // Client is up but still booting (404/503 until the summoner plugin loads)
        debug!(status = response.status, "connectivity probe not ready");
        false
      }
      _ => false,
    }
  }

  pub fn ready_check(&mut self) -> Outcome<ReadyCheck> {
    if !self.is_connected() {
      return Outcome::NotFound;
    }

    match self.send(Method::Get, READY_CHECK_ENDPOINT) {
      Outcome::Found(response) if response.status == 200 => match response.json::<ReadyCheck>() {
        Ok(ready_check) => Outcome::Found(ready_check),
        Err(e) => Outcome::Failed(e),
      },
      // 404 whenever there is no ready check
      Outcome::Found(_) => Outcome::NotFound,
      other => other.map(|_| ReadyCheck::default()),
    }
  }

  pub fn check_ready_check(&mut self) -> bool {
    match self.ready_check() {
      Outcome::Found(ready_check) => ready_check.is_in_progress(),
      Outcome::Failed(e) => {
        warn!(error = %e, "error checking ready check");
        false
      }
      Outcome::NotFound => false,
    }
  }

  pub fn accept_ready_check(&mut self) -> Outcome<()> {
    if !self.is_connected() {
      return Outcome::NotFound;
    }

    match self.send(Method::Post, READY_CHECK_ACCEPT_ENDPOINT) {
      Outcome::Found(response) if response.status == 204 => Outcome::Found(()),
      Outcome::Found(response) => {
        debug!(status = response.status, "accept rejected");
        Outcome::NotFound
      }
      other => other.map(|_| ()),
    }
  }

  pub fn accept(&mut self) -> bool {
    match self.accept_ready_check() {
      Outcome::Found(()) => true,
      Outcome::Failed(e) => {
        warn!(error = %e, "error accepting match");
        false
      }
      Outcome::NotFound => false,
    }
  }

  pub fn identity(&mut self) -> Outcome<serde_json::Value> {
    if !self.is_connected() {
      return Outcome::NotFound;
    }

    match self.send(Method::Get, CURRENT_SUMMONER_ENDPOINT) {
      Outcome::Found(response) if response.status == 200 => match response.json() {
        Ok(value) => Outcome::Found(value),
        Err(e) => Outcome::Failed(e),
      },
      Outcome::Found(_) => Outcome::NotFound,
      other => other.map(|_| serde_json::Value::Null),
    }
  }

  pub fn get_identity(&mut self) -> Option<serde_json::Value> {
    match self.identity() {
      Outcome::Failed(e) => {
        warn!(error = %e, "error getting summoner info");
        None
      }
      outcome => outcome.found(),
    }
  }

  // Every status code comes back as Found; only a missing response is Failed.
  fn send(&mut self, method: Method, endpoint: &str) -> Outcome<LcuResponse> {
    let Some(session) = self.session.as_ref() else {
      return Outcome::NotFound;
    };

    let request = LcuRequest {
      method,
      url: session.url(endpoint),
      authorization: session.authorization().to_string(),
    };

    match self.transport.send(&request) {
      Ok(response) => Outcome::Found(response),
      Err(e) => {
        if e.is_network() {
          debug!(url = %request.url, error = %e, "request failed, dropping session");
          self.replace_session(None);
        }
        Outcome::Failed(e)
      }
    }
  }

  fn replace_session(&mut self, session: Option<Session>) {
    if self.session.is_some() && session.is_none() {
      info!("lost connection to League client");
    }
    self.session = session;
    self.announced = false;
  }
}
