//! Durable session storage
//!
//! Persists the bearer token (and, when the server provides one, the user
//! profile) across process restarts, the way the browser client mirrored
//! its session into local storage. The whole session lives in a single
//! JSON file under the platform data directory.
//!
//! Lifecycle: loaded once on startup, rewritten on login/registration and
//! profile refresh, removed on logout or when the server denies the
//! session. A missing or unreadable file simply means "not authenticated".

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::model::UserProfile;

/// An authenticated session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

/// File-backed session state
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    session: Option<Session>,
}

impl SessionStore {
    /// Open the store at the given path, loading any persisted session.
    ///
    /// A corrupt file is logged and treated as an absent session; the next
    /// successful login overwrites it.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();

        let session = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| SessionError::Io {
                path: path.clone(),
                error: e.to_string(),
            })?;

            match serde_json::from_str(&content) {
                Ok(session) => Some(session),
                Err(e) => {
                    tracing::warn!(path = ?path, error = %e, "ignoring unreadable session file");
                    None
                }
            }
        } else {
            None
        };

        Ok(Self { path, session })
    }

    /// Default session file location
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .map(|p| p.join("taskdeck").join("session.json"))
            .unwrap_or_else(|| PathBuf::from("./taskdeck_session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn current(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.session.as_ref().and_then(|s| s.user.as_ref())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Store a new session, replacing any previous one on disk and in memory
    pub fn replace(&mut self, session: Session) -> Result<&Session, SessionError> {
        self.persist(&session)?;
        Ok(&*self.session.insert(session))
    }

    /// Refresh the profile held by the current session.
    ///
    /// No-op when unauthenticated. The in-memory session only changes once
    /// the file write succeeds; a persist failure leaves both copies as
    /// they were.
    pub fn update_user(&mut self, user: UserProfile) -> Result<(), SessionError> {
        if let Some(session) = &self.session {
            let mut updated = session.clone();
            updated.user = Some(user);
            self.persist(&updated)?;
            self.session = Some(updated);
        }
        Ok(())
    }

    /// Remove the session from disk and memory. Idempotent.
    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.session = None;

        if self.path.exists() {
            std::fs::remove_file(&self.path).map_err(|e| SessionError::Io {
                path: self.path.clone(),
                error: e.to_string(),
            })?;
        }

        Ok(())
    }

    fn persist(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SessionError::Io {
                path: parent.to_path_buf(),
                error: e.to_string(),
            })?;
        }

        let content =
            serde_json::to_string_pretty(session).map_err(|e| SessionError::Serialize(e.to_string()))?;

        std::fs::write(&self.path, content).map_err(|e| SessionError::Io {
            path: self.path.clone(),
            error: e.to_string(),
        })
    }
}

/// Session storage errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to access session file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("failed to serialize session: {0}")]
    Serialize(String),
}
