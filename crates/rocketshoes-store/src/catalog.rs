//! # Stock Service
//!
//! Stock and product lookups against the catalogue API.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Catalogue API                                        │
//! │                                                                         │
//! │  GET {base_url}/stock/{id}      → {"id":1,"amount":3}                  │
//! │  GET {base_url}/products/{id}   → {"id":1,"title":"…","price":179.9,   │
//! │                                    "image":"https://…"}                 │
//! │                                                                         │
//! │  404           → CatalogError::NotFound                                │
//! │  other non-2xx → CatalogError::Api { status, message }                 │
//! │  bad JSON      → CatalogError::Parse                                   │
//! │  no response   → CatalogError::Http                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use rocketshoes_core::{Product, ProductId, Stock};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::ApiSettings;
use crate::error::{CatalogError, StoreError, StoreResult};

/// Source of stock levels and product metadata.
#[async_trait]
pub trait StockService: Send + Sync {
    /// Units currently available for a product.
    async fn get_stock(&self, product_id: ProductId) -> Result<Stock, CatalogError>;

    /// Display metadata for a product.
    async fn get_product(&self, product_id: ProductId) -> Result<Product, CatalogError>;
}

// =============================================================================
// HTTP Catalogue
// =============================================================================

/// [`StockService`] backed by the catalogue's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: Client,
    base_url: String,
}

impl HttpCatalog {
    /// Creates a client for the catalogue at `base_url` with no request
    /// timeout.
    pub fn new(base_url: &str) -> StoreResult<Self> {
        Self::build(base_url, None)
    }

    /// Creates a client from the `[api]` config section.
    pub fn from_settings(settings: &ApiSettings) -> StoreResult<Self> {
        Self::build(
            &settings.base_url,
            settings.timeout_secs.map(Duration::from_secs),
        )
    }

    fn build(base_url: &str, timeout: Option<Duration>) -> StoreResult<Self> {
        let parsed = Url::parse(base_url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(StoreError::InvalidUrl(format!(
                "Catalogue URL must start with http:// or https://, got: {}",
                base_url
            )));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(CatalogError::from)?;

        Ok(HttpCatalog {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        product_id: ProductId,
    ) -> Result<T, CatalogError> {
        let url = format!("{}/{}/{}", self.base_url, path, product_id);
        debug!(url = %url, "Catalogue request");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(product_id));
        }

        let body = response.text().await?;

        if !status.is_success() {
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        serde_json::from_str(&body).map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

#[async_trait]
impl StockService for HttpCatalog {
    async fn get_stock(&self, product_id: ProductId) -> Result<Stock, CatalogError> {
        let stock: Stock = self.get_json("stock", product_id).await?;
        debug!(product_id = %product_id, amount = stock.amount, "Stock fetched");
        Ok(stock)
    }

    async fn get_product(&self, product_id: ProductId) -> Result<Product, CatalogError> {
        let product: Product = self.get_json("products", product_id).await?;

        if product.id != product_id {
            return Err(CatalogError::Parse(format!(
                "asked for product {}, catalogue returned {}",
                product_id, product.id
            )));
        }

        Ok(product)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
