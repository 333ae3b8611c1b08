//! File-backed session store for the terminal client.
//!
//! The file is a small JSON object keyed like the browser's `localStorage`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use super::{SessionStore, StoreError};
use crate::model::Session;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredSession {
    #[serde(rename = "jwtToken", default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(rename = "userEmail", default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
}

/// [`SessionStore`] persisted as JSON on disk
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Session {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Session::default(),
            Err(e) => {
                warn!(path = ?self.path, error = %e, "failed to read session file");
                return Session::default();
            }
        };

        match serde_json::from_slice::<StoredSession>(&bytes) {
            Ok(stored) => Session {
                token: stored.token,
                email: stored.email,
            },
            Err(e) => {
                warn!(path = ?self.path, error = %e, "ignoring corrupt session file");
                Session::default()
            }
        }
    }

    fn save(&self, session: &Session) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let stored = StoredSession {
            token: session.token.clone(),
            email: session.email.clone(),
        };
        std::fs::write(&self.path, serde_json::to_vec_pretty(&stored)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}
