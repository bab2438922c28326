//! # lcu-autoaccept
//!
//! Watches the local League of Legends client API and accepts matchmaking
//! ready checks as soon as they appear.
//!
//! ```text
//! config.rs        — JSON settings file + CLI flags
//! error.rs         — LcuError
//! logging.rs       — tracing subscriber, live log file
//! shutdown.rs      — Ctrl-C → ServiceHandle::stop
//! lcu/
//!   lockfile.rs    — lockfile discovery and parsing
//!   transport.rs   — HTTPS transport (self-signed local endpoint)
//!   client.rs      — LcuClient: session handling, connection-checked accessors
//!   types.rs       — Session, ReadyCheck, Summoner, Outcome
//! auto_accept/
//!   service.rs     — AutoAcceptService poll loop, ServiceHandle
//!   types.rs       — Status, shared ServiceState
//! ```

pub mod auto_accept;
pub mod config;
pub mod error;
pub mod lcu;
pub mod logging;
pub mod shutdown;

pub use auto_accept::{AutoAcceptService, ServiceHandle, Status};
pub use config::{Cli, Settings};
pub use error::LcuError;
pub use lcu::LcuClient;
