//! Capability checks derived from the stored credential.

use tracing::warn;

use super::types::{Capabilities, SessionStatus};
use crate::jwt::{self, Claims};
use crate::storage::Storage;
use crate::store::TokenStore;

/// Read-time projection of the stored credential into capability flags.
///
/// Nothing is cached: every call reloads and re-decodes, so a login or
/// logout is visible on the next call. Every failure (missing, malformed or
/// expired credential, unreadable storage) reads as "no identity".
#[derive(Clone)]
pub struct AuthGate<S> {
    store: TokenStore<S>,
}

impl<S: Storage> AuthGate<S> {
    pub fn new(store: TokenStore<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &TokenStore<S> {
        &self.store
    }

    /// Classify the stored credential.
    pub async fn status(&self) -> SessionStatus {
        let token = match self.store.load().await {
            Ok(Some(token)) => token,
            Ok(None) => return SessionStatus::Anonymous,
            Err(e) => {
                warn!(error = %e, "Failed to load credential");
                return SessionStatus::Anonymous;
            }
        };

        match jwt::decode_str(&token) {
            Some(claims) if claims.is_expired() => SessionStatus::Expired(claims),
            Some(claims) => SessionStatus::Active(claims),
            None => SessionStatus::Malformed,
        }
    }

    /// The signed-in user, or `None` if there is no usable credential.
    pub async fn current_user(&self) -> Option<Claims> {
        self.status().await.user().cloned()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current_user().await.is_some()
    }

    pub async fn is_admin(&self) -> bool {
        self.current_user()
            .await
            .is_some_and(|claims| claims.is_admin())
    }

    /// Flags for rendering navigation and product controls.
    /// The avatar falls back to the cached URL when the claims carry none.
    pub async fn capabilities(&self) -> Capabilities {
        let Some(claims) = self.current_user().await else {
            return Capabilities::default();
        };

        let avatar_url = match claims.image_url.clone() {
            Some(url) => Some(url),
            None => self.store.cached_avatar().await.ok().flatten(),
        };

        Capabilities {
            authenticated: true,
            admin: claims.is_admin(),
            display_name: Some(claims.display_name()),
            avatar_url,
        }
    }
}
