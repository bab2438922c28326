// LCU module - finds the running League client and talks to its local API

mod client;
mod lockfile;
mod transport;
mod types;

#[cfg(test)]
pub(crate) mod tests;

pub use client::LcuClient;
pub use lockfile::{
  candidate_dirs, candidate_paths, locate, Filesystem, Lockfile, OsFilesystem, LOCKFILE_NAMES,
};
pub use transport::{LcuRequest, LcuResponse, Method, ReqwestTransport, Transport};
pub use types::{
  Outcome, ReadyCheck, Session, Summoner, CURRENT_SUMMONER_ENDPOINT, READY_CHECK_ACCEPT_ENDPOINT,
  READY_CHECK_ENDPOINT, READY_CHECK_IN_PROGRESS,
};
