//! File-backed session store
//!
//! Caches the bearer token and user record between runs. The file holds
//! one JSON `Session` object.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};

use tarmeez_client::domain::entities::Session;

const DEFAULT_SESSION_FILE: &str = ".tarmeez-session.json";

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn from_env() -> Self {
        let path = std::env::var("TARMEEZ_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SESSION_FILE));
        Self { path }
    }

    #[cfg(test)]
    fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the cached session, if a readable one exists.
    pub fn load(&self) -> Option<Session> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("could not read session file {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!("ignoring corrupt session file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        let raw = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, raw)
            .with_context(|| format!("failed to write session file {}", self.path.display()))
    }

    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| {
                format!("failed to remove session file {}", self.path.display())
            }),
        }
    }
}
