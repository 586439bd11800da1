use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{ClientError, StorefrontClient};

/// Product record as returned by search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub brand: String,
    #[serde(rename = "Model")]
    pub model: String,
    pub price: f64,
    pub stock: i64,
}

/// Product creation form (admin only).
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub brand: String,
    #[serde(rename = "Model")]
    pub model: String,
    pub stock: u32,
    pub price: f64,
}

impl NewProduct {
    fn validate(&self) -> Result<(), ClientError> {
        if self.brand.trim().is_empty() {
            return Err(ClientError::invalid("Brand is required"));
        }
        if self.model.trim().is_empty() {
            return Err(ClientError::invalid("Model is required"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(ClientError::invalid("Price must be a non-negative number"));
        }
        Ok(())
    }
}

impl StorefrontClient {
    /// `POST /api/product/addProduct` with the caller's bearer credential.
    pub async fn add_product(&self, token: &str, product: &NewProduct) -> Result<(), ClientError> {
        product.validate()?;

        let response = self
            .http
            .post(self.endpoint("api/product/addProduct")?)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .json(product)
            .send()
            .await?;

        Self::check(response).await?;
        info!(brand = %product.brand, model = %product.model, "Product created");
        Ok(())
    }

    /// `GET /api/product/search?query=<text>`. Unauthenticated.
    pub async fn search(&self, query: &str) -> Result<Vec<Product>, ClientError> {
        let mut url = self.endpoint("api/product/search")?;
        url.query_pairs_mut().append_pair("query", query);

        let response = self.http.get(url).send().await?;
        Self::parse(response).await
    }
}
