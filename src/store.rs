//! Credential persistence.
//!
//! All reads and writes of the stored credential go through [`TokenStore`],
//! so session start (login) and end (logout) happen in one place.

use tracing::debug;

use crate::storage::{Storage, StorageError};

/// Storage key holding the raw credential.
pub const TOKEN_KEY: &str = "token";

/// Storage key caching the avatar URL for display. Best-effort only.
pub const AVATAR_KEY: &str = "avatarUrl";

/// The single credential slot of an origin.
#[derive(Clone)]
pub struct TokenStore<S> {
    storage: S,
}

impl<S: Storage> TokenStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Store a credential, replacing any previous one. Not validated.
    pub async fn save(&self, token: &str) -> Result<(), StorageError> {
        self.storage.set(TOKEN_KEY, token).await?;
        debug!("Credential stored");
        Ok(())
    }

    /// The stored credential, if any.
    pub async fn load(&self) -> Result<Option<String>, StorageError> {
        self.storage.get(TOKEN_KEY).await
    }

    /// Remove the credential. Clearing an empty store is fine.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(TOKEN_KEY).await?;
        debug!("Credential cleared");
        Ok(())
    }

    pub async fn cache_avatar(&self, url: &str) -> Result<(), StorageError> {
        self.storage.set(AVATAR_KEY, url).await
    }

    pub async fn cached_avatar(&self) -> Result<Option<String>, StorageError> {
        self.storage.get(AVATAR_KEY).await
    }

    /// Remove the credential and every cache derived from it.
    pub async fn clear_all(&self) -> Result<(), StorageError> {
        self.clear().await?;
        self.storage.remove(AVATAR_KEY).await
    }
}
