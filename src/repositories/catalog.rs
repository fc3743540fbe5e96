use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::models::{LookupError, LookupResult, Product, ProductId, StockRecord};

/// Read-only access to product metadata
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Fetch a product by id; unknown ids are an error
    async fn get_product(&self, product_id: ProductId) -> LookupResult<Product>;
}

/// Read-only access to current stock levels
#[async_trait]
pub trait StockService: Send + Sync {
    /// Fetch the stock snapshot for a product; unknown ids are an error
    async fn get_stock(&self, product_id: ProductId) -> LookupResult<StockRecord>;
}

/// Storefront REST API serving `/products/{id}` and `/stock/{id}`
#[derive(Debug, Clone)]
pub struct HttpStorefrontApi {
    client: Client,
    base_url: String,
}

impl HttpStorefrontApi {
    /// Create a client for the API at `base_url` with a per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> LookupResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LookupError::Request {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self::with_client(client, base_url))
    }

    /// Use an existing reqwest client
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource)
    }

    async fn get_json<T: DeserializeOwned>(&self, resource: &str) -> LookupResult<T> {
        let response = self
            .client
            .get(self.url(resource))
            .send()
            .await
            .map_err(|e| LookupError::Request {
                message: e.to_string(),
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(resource, "Resource not found");
            return Err(LookupError::NotFound {
                resource: resource.to_string(),
            });
        }
        if !status.is_success() {
            warn!(resource, status = status.as_u16(), "Unexpected response status");
            return Err(LookupError::Status {
                resource: resource.to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|e| LookupError::Decode {
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl ProductCatalog for HttpStorefrontApi {
    #[instrument(skip(self))]
    async fn get_product(&self, product_id: ProductId) -> LookupResult<Product> {
        debug!("Fetching product");
        self.get_json(&format!("products/{}", product_id)).await
    }
}

#[async_trait]
impl StockService for HttpStorefrontApi {
    #[instrument(skip(self))]
    async fn get_stock(&self, product_id: ProductId) -> LookupResult<StockRecord> {
        debug!("Fetching stock");
        self.get_json(&format!("stock/{}", product_id)).await
    }
}
