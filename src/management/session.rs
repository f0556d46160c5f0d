use std::{fmt, io::ErrorKind, path::PathBuf};

use async_trait::async_trait;

use crate::{config, debug, spotify::Session};

#[derive(Debug)]
pub enum StoreError {
    NotFound,
    IoError(std::io::Error),
    SerdeError(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound => write!(f, "no stored session found"),
            StoreError::IoError(e) => write!(f, "session file error: {}", e),
            StoreError::SerdeError(e) => write!(f, "session file is not valid JSON: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            ErrorKind::NotFound => StoreError::NotFound,
            _ => StoreError::IoError(err),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::SerdeError(err)
    }
}

/// Storage for the Spotify session between runs.
///
/// Callers issue at most one read and one write per run and never write
/// concurrently.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn read(&self) -> Result<Session, StoreError>;
    async fn write(&self, session: &Session) -> Result<(), StoreError>;
}

/// Keeps the session as plain JSON in the local data directory.
pub struct SessionManager {
    path: PathBuf,
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            path: Self::session_path(),
        }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn session_path() -> PathBuf {
        let mut path = config::data_dir();
        path.push("cache/session.json");
        path
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for SessionManager {
    async fn read(&self) -> Result<Session, StoreError> {
        debug!("Reading session from {}", self.path.display());
        let content = async_fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn write(&self, session: &Session) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(session)?;
        async_fs::write(&self.path, json).await?;
        debug!("Session saved to {}", self.path.display());
        Ok(())
    }
}
