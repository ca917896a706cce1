// SPDX-License-Identifier: MPL-2.0

use crate::api::Session;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("could not determine data directory")]
    NoDataDir,
    #[error("session not found")]
    NotFound,
    #[error("failed to access session file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid session data: {0}")]
    InvalidData(#[from] serde_json::Error),
}

/// Persists the bearer token between runs as a user-only readable JSON file.
pub struct SessionManager {
    path: PathBuf,
}

impl SessionManager {
    /// Path: ~/.local/share/vistagram/session.json
    pub fn new() -> Result<Self, SessionError> {
        let dir = dirs::data_dir().ok_or(SessionError::NoDataDir)?;
        Ok(Self::at(dir.join("vistagram").join("session.json")))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn store(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_vec_pretty(session)?;
        std::fs::write(&self.path, json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    pub fn load(&self) -> Result<Session, SessionError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SessionError::NotFound);
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
