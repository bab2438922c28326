// Types and constants for the LCU client

use base64::{engine::general_purpose, Engine};
use serde::Deserialize;

use crate::error::LcuError;

pub const LCU_USERNAME: &str = "riot";
pub const LCU_HOST: &str = "127.0.0.1";

pub const CURRENT_SUMMONER_ENDPOINT: &str = "/lol-summoner/v1/current-summoner";
pub const READY_CHECK_ENDPOINT: &str = "/lol-matchmaking/v1/ready-check";
pub const READY_CHECK_ACCEPT_ENDPOINT: &str = "/lol-matchmaking/v1/ready-check/accept";

/// Ready check state meaning a match is waiting for our confirmation.
pub const READY_CHECK_IN_PROGRESS: &str = "InProgress";

/// Connection details for one running client instance.
///
/// A session is built in one piece from a parsed lockfile and dropped in one
/// piece, so the port, password, endpoint and auth header always belong to
/// the same client process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
  port: u16,
  password: String,
  protocol: String,
  base_url: String,
  authorization: String,
}

impl Session {
  pub fn new(port: u16, password: impl Into<String>, protocol: impl Into<String>) -> Self {
    let password = password.into();
    let protocol = protocol.into();
    let base_url = format!("{}://{}:{}", protocol, LCU_HOST, port);
    let auth = general_purpose::STANDARD.encode(format!("{}:{}", LCU_USERNAME, password));
    Self {
      port,
      password,
      protocol,
      base_url,
      authorization: format!("Basic {}", auth),
    }
  }

  pub fn port(&self) -> u16 {
    self.port
  }

  pub fn password(&self) -> &str {
    &self.password
  }

  pub fn protocol(&self) -> &str {
    &self.protocol
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// Value for the `Authorization` header (HTTP Basic, `riot:<password>`).
  pub fn authorization(&self) -> &str {
    &self.authorization
  }

  pub fn url(&self, endpoint: &str) -> String {
    format!("{}{}", self.base_url, endpoint)
  }
}

/// `GET /lol-matchmaking/v1/ready-check`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadyCheck {
  #[serde(default)]
  pub state: String,
  #[serde(default)]
  pub player_response: Option<String>,
  #[serde(default)]
  pub timer: Option<f64>,
}

impl ReadyCheck {
  pub fn is_in_progress(&self) -> bool {
    self.state == READY_CHECK_IN_PROGRESS
  }
}

/// The handful of identity fields we log when a client is first reached.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summoner {
  #[serde(default)]
  pub summoner_id: Option<u64>,
  #[serde(default)]
  pub display_name: Option<String>,
  #[serde(default)]
  pub game_name: Option<String>,
  #[serde(default)]
  pub tag_line: Option<String>,
}

impl Summoner {
  pub fn from_value(value: &serde_json::Value) -> Self {
    serde_json::from_value(value.clone()).unwrap_or_default()
  }

  // displayName is empty on Riot ID accounts, fall back to gameName#tagLine
  pub fn name(&self) -> String {
    let non_empty = |s: &Option<String>| s.as_deref().filter(|v| !v.is_empty()).map(str::to_string);

    if let Some(display) = non_empty(&self.display_name) {
      return display;
    }
    match (non_empty(&self.game_name), non_empty(&self.tag_line)) {
      (Some(name), Some(tag)) => format!("{}#{}", name, tag),
      (Some(name), None) => name,
      _ => self
        .summoner_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "unknown".to_string()),
    }
  }
}

/// Result of a single connection-checked accessor call.
#[derive(Debug)]
pub enum Outcome<T> {
  /// The endpoint answered with the expected status and payload.
  Found(T),
  /// Not connected, or the endpoint answered with anything else.
  NotFound,
  /// The request or its decoding failed.
  Failed(LcuError),
}

impl<T> Outcome<T> {
  pub fn found(self) -> Option<T> {
    match self {
      Self::Found(value) => Some(value),
      _ => None,
    }
  }

  pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
    match self {
      Self::Found(value) => Outcome::Found(f(value)),
      Self::NotFound => Outcome::NotFound,
      Self::Failed(err) => Outcome::Failed(err),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn session_builds_endpoint_and_basic_auth() {
    let session = Session::new(54321, "s3cr3t", "https");
    assert_eq!(session.base_url(), "https://127.0.0.1:54321");
    assert_eq!(
      session.url(READY_CHECK_ENDPOINT),
      "https://127.0.0.1:54321/lol-matchmaking/v1/ready-check"
    );
    // base64("riot:s3cr3t")
    assert_eq!(session.authorization(), "Basic cmlvdDpzM2NyM3Q=");
  }

  #[test]
  fn ready_check_decodes_partial_payloads() {
    let rc: ReadyCheck = serde_json::from_str(r#"{"state":"InProgress","timer":3.5}"#).unwrap();
    assert!(rc.is_in_progress());
    assert_eq!(rc.timer, Some(3.5));

    let rc: ReadyCheck = serde_json::from_str(r#"{"playerResponse":"None"}"#).unwrap();
    assert!(!rc.is_in_progress());
  }

  #[test]
  fn summoner_name_fallbacks() {
    let value = serde_json::json!({"displayName": "", "gameName": "Faker", "tagLine": "KR1"});
    assert_eq!(Summoner::from_value(&value).name(), "Faker#KR1");

    let value = serde_json::json!({"displayName": "Old Name", "gameName": "Faker"});
    assert_eq!(Summoner::from_value(&value).name(), "Old Name");

    let value = serde_json::json!({"summonerId": 42});
    assert_eq!(Summoner::from_value(&value).name(), "42");
  }
}
