// Auto-accept module - polls the client and confirms ready checks

mod service;
mod types;

#[cfg(test)]
pub(crate) mod tests;

pub use service::{
  AutoAcceptService, MatchmakingApi, ServiceHandle, Sleeper, ThreadSleeper, Timings,
};
pub use types::{ServiceState, Status, StatusListener};
