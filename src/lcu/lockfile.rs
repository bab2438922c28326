// Lockfile discovery and parsing

use std::io;
use std::path::{Path, PathBuf};

use super::types::Session;
use crate::error::{LcuError, Result};

/// Names the client has used for its lockfile, newest first.
pub const LOCKFILE_NAMES: [&str; 3] = ["lockfile", "LeagueClientUx.lockfile", "LeagueClient.lockfile"];

const LEAGUE_SUBDIR: [&str; 2] = ["Riot Games", "League of Legends"];

/// Read-only view of the filesystem, so discovery can run against fakes.
pub trait Filesystem: Send {
  fn exists(&self, path: &Path) -> bool;
  fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct OsFilesystem;

impl Filesystem for OsFilesystem {
  fn exists(&self, path: &Path) -> bool {
    path.exists()
  }

  fn read_to_string(&self, path: &Path) -> io::Result<String> {
    std::fs::read_to_string(path)
  }
}

/// Fields we use from `name:pid:port:password:protocol`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lockfile {
  pub port: u16,
  pub password: String,
  pub protocol: String,
}

impl Lockfile {
  pub fn parse(contents: &str) -> Result<Self> {
    let parts: Vec<&str> = contents.trim().split(':').collect();
    if parts.len() < 5 {
      return Err(LcuError::MalformedLockfile(parts.len()));
    }

    let port = parts[2]
      .trim()
      .parse::<u16>()
      .map_err(|_| LcuError::InvalidPort(parts[2].to_string()))?;

    Ok(Self {
      port,
      password: parts[3].to_string(),
      protocol: parts[4].trim().to_string(),
    })
  }

  pub fn read(fs: &dyn Filesystem, path: &Path) -> Result<Self> {
    let contents = fs.read_to_string(path).map_err(|source| LcuError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    Self::parse(&contents)
  }

  pub fn into_session(self) -> Session {
    Session::new(self.port, self.password, self.protocol)
  }
}

/// Install directories to search, in priority order.
///
/// `lookup` resolves environment variables; unset ones resolve to an empty
/// string, which leaves a relative path that simply won't exist.
pub fn candidate_dirs<F>(league_path: Option<&Path>, lookup: F) -> Vec<PathBuf>
where
  F: Fn(&str) -> Option<String>,
{
  let env = |key: &str| PathBuf::from(lookup(key).unwrap_or_default());
  let league_dir = |base: PathBuf| LEAGUE_SUBDIR.iter().fold(base, |dir, part| dir.join(part));

  let mut dirs = Vec::new();
  if let Some(path) = league_path {
    dirs.push(path.to_path_buf());
  }
  dirs.push(league_dir(env("LOCALAPPDATA")));
  dirs.push(league_dir(env("PROGRAMFILES")));
  // Default installer location
  dirs.push(PathBuf::from(r"C:\Riot Games\League of Legends"));
  dirs.push(league_dir(env("PROGRAMFILES(X86)")));
  dirs.push(league_dir(env("USERPROFILE")));
  dirs
}

/// Every lockfile path worth probing, directory by directory.
pub fn candidate_paths(dirs: &[PathBuf]) -> Vec<PathBuf> {
  dirs
    .iter()
    .flat_map(|dir| LOCKFILE_NAMES.iter().map(move |name| dir.join(name)))
    .collect()
}

/// First candidate that exists on `fs`.
pub fn locate(fs: &dyn Filesystem, candidates: &[PathBuf]) -> Option<PathBuf> {
  candidates.iter().find(|path| fs.exists(path)).cloned()
}
