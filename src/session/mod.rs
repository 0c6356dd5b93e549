//! Session storage for the signed-in profile. The session is a single slot
//! under one key of a key-value store; production uses [`FileStore`] and tests
//! use [`MemoryStore`]. Reads never fail: a missing or unreadable entry is an
//! absent session.
//!
//! There is no expiry. A stored profile is trusted until [`Session::clear`] runs,
//! so callers that suspend should re-read instead of holding a copy.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::profile::UserProfile;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Key holding the serialized profile.
pub const SESSION_KEY: &str = "user";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Raw string storage addressed by key, the shape of browser local storage.
pub trait KeyValueStore: Send + Sync {
    /// Returns `None` when the key does not exist.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replaces the value for `key` with a single write.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Typed view over the session slot.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn KeyValueStore>,
}

impl Session {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Reads the stored profile; malformed or unreadable entries count as absent.
    #[must_use]
    pub fn get(&self) -> Option<UserProfile> {
        let raw = match self.store.get(SESSION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!("Failed to read session: {}", err);
                return None;
            }
        };

        match serde_json::from_str::<UserProfile>(&raw) {
            Ok(profile) => Some(profile),
            Err(err) => {
                warn!("Ignoring malformed session entry: {}", err);
                None
            }
        }
    }

    /// Stores `profile`, replacing whatever was there.
    ///
    /// # Errors
    /// Returns an error if the profile cannot be encoded or written.
    pub fn set(&self, profile: &UserProfile) -> Result<(), StoreError> {
        let raw = serde_json::to_string(profile)
            .map_err(|err| StoreError::Serialization(err.to_string()))?;
        self.store.set(SESSION_KEY, &raw)?;

        debug!(user_id = %profile.id, rol = %profile.rol, "session stored");

        Ok(())
    }

    /// Deletes the session entry; clearing an empty session succeeds.
    ///
    /// # Errors
    /// Returns an error if the backing store fails to remove the entry.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(SESSION_KEY)?;

        debug!("session cleared");

        Ok(())
    }

    /// [`Session::get`] on the blocking pool, for async callers.
    pub async fn load(&self) -> Option<UserProfile> {
        let session = self.clone();

        tokio::task::spawn_blocking(move || session.get())
            .await
            .unwrap_or_else(|err| {
                error!("Session read task failed: {}", err);
                None
            })
    }

    /// [`Session::set`] on the blocking pool, for async callers.
    ///
    /// # Errors
    /// Returns an error if the profile cannot be written.
    pub async fn save(&self, profile: &UserProfile) -> Result<(), StoreError> {
        let session = self.clone();
        let profile = profile.clone();

        tokio::task::spawn_blocking(move || session.set(&profile))
            .await
            .map_err(|err| StoreError::Io(std::io::Error::other(err)))?
    }

    /// [`Session::clear`] on the blocking pool, for async callers.
    ///
    /// # Errors
    /// Returns an error if the entry cannot be removed.
    pub async fn discard(&self) -> Result<(), StoreError> {
        let session = self.clone();

        tokio::task::spawn_blocking(move || session.clear())
            .await
            .map_err(|err| StoreError::Io(std::io::Error::other(err)))?
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.get().is_some_and(|profile| profile.is_admin())
    }

    #[must_use]
    pub fn is_employee(&self) -> bool {
        self.get().is_some_and(|profile| profile.is_employee())
    }
}
