//! Session Storage
//!
//! Durable client-side storage for the bearer token and cached email. Both
//! values live under fixed keys and are always cleared together.

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileSessionStore;

use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

use crate::model::Session;

/// Storage key of the bearer token
pub const TOKEN_KEY: &str = "jwtToken";

/// Storage key of the cached user email
pub const EMAIL_KEY: &str = "userEmail";

/// Durable store for the [`Session`]
pub trait SessionStore {
    /// Load the cached session; unreadable storage yields an empty session
    fn load(&self) -> Session;

    /// Persist both token and email, removing keys whose value is absent
    fn save(&self, session: &Session) -> Result<(), StoreError>;

    /// Remove token and email
    fn clear(&self) -> Result<(), StoreError>;
}

impl<S: SessionStore + ?Sized> SessionStore for Rc<S> {
    fn load(&self) -> Session {
        (**self).load()
    }

    fn save(&self, session: &Session) -> Result<(), StoreError> {
        (**self).save(session)
    }

    fn clear(&self) -> Result<(), StoreError> {
        (**self).clear()
    }
}

/// Session storage errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// In-memory store, for tests and storage-less environments
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: RefCell<Session>,
    clears: RefCell<usize>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with a cached session
    pub fn with_session(session: Session) -> Self {
        Self {
            session: RefCell::new(session),
            clears: RefCell::new(0),
        }
    }

    /// Current stored value
    pub fn snapshot(&self) -> Session {
        self.session.borrow().clone()
    }

    /// How many times [`SessionStore::clear`] ran
    pub fn clear_count(&self) -> usize {
        *self.clears.borrow()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Session {
        self.snapshot()
    }

    fn save(&self, session: &Session) -> Result<(), StoreError> {
        *self.session.borrow_mut() = session.clone();
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.session.borrow_mut() = Session::default();
        *self.clears.borrow_mut() += 1;
        Ok(())
    }
}
