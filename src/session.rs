//! Session flows: the only places a credential is written or removed.

use tracing::{info, warn};

use crate::api::{ClientError, NewProduct, Product, SignupRequest, StorefrontClient};
use crate::auth::{Access, AuthGate, Requirement};
use crate::jwt::{self, Claims};
use crate::storage::{Storage, StorageError};
use crate::store::TokenStore;

/// Ties the backend client to one origin's credential slot.
#[derive(Clone)]
pub struct Session<S> {
    client: StorefrontClient,
    gate: AuthGate<S>,
}

impl<S: Storage> Session<S> {
    pub fn new(client: StorefrontClient, storage: S) -> Self {
        Self {
            client,
            gate: AuthGate::new(TokenStore::new(storage)),
        }
    }

    pub fn gate(&self) -> &AuthGate<S> {
        &self.gate
    }

    pub fn store(&self) -> &TokenStore<S> {
        self.gate.store()
    }

    /// Log in and persist the issued credential.
    ///
    /// Returns the decoded claims, or `None` if the backend issued a
    /// credential this client cannot read (it is stored regardless).
    pub async fn login(&self, email: &str, password: &str) -> Result<Option<Claims>, SessionError> {
        let token = self.client.login(email, password).await?;
        self.start(&token).await
    }

    /// Register an account. If the backend signs the account in directly,
    /// the credential is persisted like a login.
    pub async fn signup(&self, request: &SignupRequest) -> Result<Option<Claims>, SessionError> {
        match self.client.signup(request).await? {
            Some(token) => self.start(&token).await,
            None => {
                info!(email = %request.email, "Account created");
                Ok(None)
            }
        }
    }

    /// End the session. Safe to call when already logged out.
    pub async fn logout(&self) -> Result<(), SessionError> {
        self.store().clear_all().await?;
        info!("Logged out");
        Ok(())
    }

    /// Create a product as the signed-in admin.
    pub async fn add_product(&self, product: &NewProduct) -> Result<(), SessionError> {
        match self.gate.require(Requirement::Admin).await {
            Access::Granted(_) => {}
            Access::Forbidden(claims) => {
                warn!(user = %claims.sub, "Product creation refused: not an admin");
                return Err(SessionError::Forbidden);
            }
            Access::RedirectToLogin => return Err(SessionError::LoginRequired),
        }

        let token = self
            .store()
            .load()
            .await?
            .ok_or(SessionError::LoginRequired)?;

        self.client.add_product(&token, product).await?;
        Ok(())
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Product>, SessionError> {
        Ok(self.client.search(query).await?)
    }

    async fn start(&self, token: &str) -> Result<Option<Claims>, SessionError> {
        // Drop the previous user's derived caches along with their credential
        self.store().clear_all().await?;
        self.store().save(token).await?;

        let claims = jwt::decode_str(token);
        match &claims {
            Some(claims) => {
                if let Some(url) = &claims.image_url {
                    if let Err(e) = self.store().cache_avatar(url).await {
                        warn!(error = %e, "Failed to cache avatar");
                    }
                }
                info!(user = %claims.sub, role = claims.role.as_str(), "Session started");
            }
            None => warn!("Stored credential has unreadable claims"),
        }
        Ok(claims)
    }
}

/// Errors from session flows.
#[derive(Debug)]
pub enum SessionError {
    /// Backend or network failure, shown to the user as-is
    Client(ClientError),
    /// Local storage failure
    Storage(StorageError),
    /// No usable credential; the user must log in
    LoginRequired,
    /// Signed in without the admin role
    Forbidden,
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Client(e) => write!(f, "{}", e),
            SessionError::Storage(e) => write!(f, "{}", e),
            SessionError::LoginRequired => write!(f, "Please log in first"),
            SessionError::Forbidden => write!(f, "Only administrators can do that"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Client(e) => Some(e),
            SessionError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ClientError> for SessionError {
    fn from(e: ClientError) -> Self {
        SessionError::Client(e)
    }
}

impl From<StorageError> for SessionError {
    fn from(e: StorageError) -> Self {
        SessionError::Storage(e)
    }
}
