// HTTP transport to the local client API

use std::time::Duration;

use reqwest::header::AUTHORIZATION;

use crate::error::{LcuError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
  Get,
  Post,
}

#[derive(Debug, Clone)]
pub struct LcuRequest {
  pub method: Method,
  pub url: String,
  pub authorization: String,
}

#[derive(Debug, Clone)]
pub struct LcuResponse {
  pub status: u16,
  pub body: String,
}

impl LcuResponse {
  pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
    Ok(serde_json::from_str(&self.body)?)
  }
}

/// Sends one request and returns whatever the server answered.
///
/// Implementations return `Err` only when no HTTP response was received at
/// all; any status code, including 4xx/5xx, is an `Ok`.
pub trait Transport: Send {
  fn send(&self, request: &LcuRequest) -> Result<LcuResponse>;
}

pub struct ReqwestTransport {
  client: reqwest::blocking::Client,
}

impl ReqwestTransport {
  pub fn new(timeout: Duration) -> Result<Self> {
    // Certificate validation is off on purpose. The client serves a
    // self-signed certificate on 127.0.0.1 only, and the per-session password
    // from the lockfile is what authenticates the peer. Do not reuse this
    // client for anything that leaves the machine.
    let client = reqwest::blocking::Client::builder()
      .danger_accept_invalid_certs(true)
      .timeout(timeout)
      .connect_timeout(timeout)
      .pool_max_idle_per_host(2)
      .build()?;
    Ok(Self { client })
  }
}

impl Transport for ReqwestTransport {
  fn send(&self, request: &LcuRequest) -> Result<LcuResponse> {
    let builder = match request.method {
      Method::Get => self.client.get(&request.url),
      Method::Post => self.client.post(&request.url),
    };

    let response = builder
      .header(AUTHORIZATION, &request.authorization)
      .send()?;
    let status = response.status().as_u16();
    let body = response
      .text()
      .map_err(|e| LcuError::Transport(format!("failed to read response body: {}", e)))?;

    Ok(LcuResponse { status, body })
  }
}
