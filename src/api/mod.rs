//! HTTP client for the storefront backend.
//!
//! Every call is a single independent request: no retries, no ordering
//! between in-flight calls.

mod error;
mod products;
mod users;

use reqwest::{Response, Url};
use serde::de::DeserializeOwned;

pub use error::ClientError;
pub use products::{NewProduct, Product};
pub use users::{LoginResponse, SignupRequest};

/// Typed client for the backend's REST contract.
#[derive(Clone)]
pub struct StorefrontClient {
    base: Url,
    http: reqwest::Client,
}

impl StorefrontClient {
    /// Create a client for the backend at `base` (e.g. `http://localhost:5000`).
    pub fn new(base: Url) -> Self {
        Self::with_client(base, reqwest::Client::new())
    }

    pub fn with_client(mut base: Url, http: reqwest::Client) -> Self {
        // Url::join replaces the last path segment unless the base ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self { base, http }
    }

    /// Storage scope for this backend, like a browser origin.
    pub fn origin(&self) -> String {
        self.base.origin().ascii_serialization()
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base.join(path)?)
    }

    /// Turn a response into `T`, or into the error its status describes.
    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let response = Self::check(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn check(response: Response) -> Result<Response, ClientError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(ClientError::from_response(response).await)
        }
    }
}
