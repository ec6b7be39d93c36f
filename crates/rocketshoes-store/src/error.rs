//! # Store Error Types
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Store Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Catalogue     │  │     Storage             │ │
//! │  │                 │  │  (CatalogError) │  │  (StorageError)         │ │
//! │  │  InvalidConfig  │  │  Http           │  │  Database               │ │
//! │  │  InvalidUrl     │  │  Api / NotFound │  │  Unavailable            │ │
//! │  │  ConfigLoad/Save│  │  Parse          │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │   Cart rules    │  │   Lifecycle     │                              │
//! │  │  (CoreError)    │  │                 │                              │
//! │  │  OutOfStock     │  │  ShuttingDown   │                              │
//! │  │  NotInCart      │  │  ChannelError   │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Inside the store every failure of an operation ends up as a
//! [`CartNotice`](crate::notify::CartNotice). Only the lifecycle variants
//! ever reach a handle's caller as an `Err`.

use rocketshoes_core::{CoreError, ProductId};
use rocketshoes_db::DbError;
use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Catalogue Errors
// =============================================================================

/// Failures talking to the stock/product catalogue.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport-level failure (connection refused, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalogue answered with a non-success status.
    #[error("Catalogue returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The catalogue has no record for this product.
    #[error("Product {0} not found in catalogue")]
    NotFound(ProductId),

    /// The response body was not the expected JSON.
    #[error("Failed to parse catalogue response: {0}")]
    Parse(String),

    /// The catalogue could not be reached for another reason.
    #[error("Catalogue unavailable: {0}")]
    Unavailable(String),
}

impl CatalogError {
    /// Returns true if retrying the lookup may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            CatalogError::Http(_) | CatalogError::Unavailable(_) => true,
            CatalogError::Api { status, .. } => *status >= 500,
            CatalogError::NotFound(_) | CatalogError::Parse(_) => false,
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Failures reading or writing persistent storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// SQLite backend failure.
    #[error("Storage database error: {0}")]
    Database(#[from] DbError),

    /// Any other backend failure.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

// =============================================================================
// Store Errors
// =============================================================================

/// Store error type covering configuration, collaborators and lifecycle.
#[derive(Debug, Error)]
pub enum StoreError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid store configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid catalogue URL.
    #[error("Invalid catalogue URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Operation Errors
    // =========================================================================
    /// A cart rule rejected the operation.
    #[error(transparent)]
    Cart(#[from] CoreError),

    /// Stock or product lookup failed.
    #[error("Catalogue lookup failed: {0}")]
    Catalog(#[from] CatalogError),

    /// Persisting the cart failed.
    #[error("Storage failed: {0}")]
    Storage(#[from] StorageError),

    // =========================================================================
    // Lifecycle Errors
    // =========================================================================
    /// The store task has stopped.
    #[error("Cart store is shutting down")]
    ShuttingDown,

    /// Channel send/receive failed.
    #[error("Channel error: {0}")]
    ChannelError(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<url::ParseError> for StoreError {
    fn from(err: url::ParseError) -> Self {
        StoreError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for StoreError {
    fn from(err: toml::de::Error) -> Self {
        StoreError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for StoreError {
    fn from(err: toml::ser::Error) -> Self {
        StoreError::ConfigSaveFailed(err.to_string())
    }
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        StoreError::Storage(StorageError::Database(err))
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl StoreError {
    /// Returns true if the stock level rejected the operation.
    pub fn is_out_of_stock(&self) -> bool {
        matches!(self, StoreError::Cart(CoreError::OutOfStock { .. }))
    }

    /// Returns true if repeating the same operation may succeed.
    ///
    /// ## Transient
    /// - Catalogue network failures and 5xx answers
    /// - Storage failures
    ///
    /// ## Not Transient
    /// - Cart rule rejections
    /// - Configuration and lifecycle errors
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Catalog(err) => err.is_transient(),
            StoreError::Storage(_) => true,
            _ => false,
        }
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            StoreError::InvalidConfig(_)
                | StoreError::InvalidUrl(_)
                | StoreError::ConfigLoadFailed(_)
                | StoreError::ConfigSaveFailed(_)
        )
    }
}
