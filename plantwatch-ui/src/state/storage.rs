//! Session persistence in `localStorage`.

use plantwatch::session::{EMAIL_KEY, TOKEN_KEY};
use plantwatch::{Session, SessionStore, StoreError};
use web_sys::Storage;

/// [`SessionStore`] backed by the window's `localStorage`
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalSessionStore;

impl LocalSessionStore {
    fn storage(&self) -> Result<Storage, StoreError> {
        web_sys::window()
            .ok_or_else(|| StoreError::Unavailable("no window".to_string()))?
            .local_storage()
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| StoreError::Unavailable("localStorage disabled".to_string()))
    }

    fn write(storage: &Storage, key: &str, value: Option<&str>) -> Result<(), StoreError> {
        match value {
            Some(value) => storage.set_item(key, value),
            None => storage.remove_item(key),
        }
        .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))
    }
}

impl SessionStore for LocalSessionStore {
    fn load(&self) -> Session {
        let Ok(storage) = self.storage() else {
            return Session::default();
        };
        Session {
            token: storage.get_item(TOKEN_KEY).ok().flatten(),
            email: storage.get_item(EMAIL_KEY).ok().flatten(),
        }
    }

    fn save(&self, session: &Session) -> Result<(), StoreError> {
        let storage = self.storage()?;
        Self::write(&storage, TOKEN_KEY, session.token.as_deref())?;
        Self::write(&storage, EMAIL_KEY, session.email.as_deref())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let storage = self.storage()?;
        Self::write(&storage, TOKEN_KEY, None)?;
        Self::write(&storage, EMAIL_KEY, None)
    }
}
