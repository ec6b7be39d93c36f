//! # Application State
//!
//! Everything a command needs, opened once per invocation.
//!
//! ```text
//! StoreConfig ──► Database::new(storage.database_path)
//!      │                 │
//!      │                 └─► db.storage()  ──┐
//!      │                                     ▼
//!      └──► HttpCatalog::from_settings ──► CartStore::initialize ──► start()
//!                                                                     │
//!                                              AppState.cart ◄────────┘
//! ```

use rocketshoes_db::{Database, DbConfig};
use rocketshoes_store::{
    CartNotifier, CartStore, CartStoreHandle, CartStoreOptions, HttpCatalog, StoreConfig,
};
use std::sync::Arc;
use tracing::info;

use crate::error::{CliError, CliResult, ErrorCode};

/// Open database and running cart store.
pub struct AppState {
    pub db: Database,
    pub cart: CartStoreHandle,
}

impl AppState {
    /// Opens the database, restores the cart and starts the store.
    pub async fn open(config: &StoreConfig, notifier: Arc<dyn CartNotifier>) -> CliResult<Self> {
        let db = Database::new(DbConfig::new(&config.storage.database_path)).await?;
        if !db.health_check().await {
            return Err(CliError::new(
                ErrorCode::DatabaseError,
                format!(
                    "Database at {} does not answer queries",
                    config.storage.database_path.display()
                ),
            ));
        }
        info!(path = %config.storage.database_path.display(), "Database ready");

        let catalog = HttpCatalog::from_settings(&config.api)?;

        let store = CartStore::initialize(
            Arc::new(catalog),
            Arc::new(db.storage()),
            CartStoreOptions::default()
                .storage_key(&config.storage.cart_key)
                .notifier(notifier),
        )
        .await;

        Ok(AppState {
            db,
            cart: store.start(),
        })
    }

    /// Stops the store and closes the database.
    pub async fn close(self) {
        // A store that already stopped has nothing left to flush
        let _ = self.cart.shutdown().await;
        self.db.close().await;
    }
}
