//! # rocketshoes-store: Cart Store Runtime
//!
//! Everything with a side effect around the cart: stock lookups, write-through
//! persistence, publishing, and shopper notices.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cart Store Architecture                          │
//! │                                                                         │
//! │   UI / CLI ──► CartStoreHandle (clone freely)                          │
//! │                     │ mpsc: Add / Remove / Update / Shutdown            │
//! │                     ▼                                                   │
//! │   ┌────────────────────────────────────────────────────────────────┐   │
//! │   │                CartStore task (one at a time)                  │   │
//! │   │                                                                │   │
//! │   │   Arc<dyn StockService>   Arc<dyn PersistentStorage>           │   │
//! │   │   HttpCatalog / fakes     StorageRepository / MemoryStorage    │   │
//! │   │                                                                │   │
//! │   │   Arc<dyn CartNotifier>   watch::Sender<Cart>                  │   │
//! │   │   toasts                  committed carts                      │   │
//! │   └────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - `CartStore`, its task and `CartStoreHandle`
//! - [`catalog`] - `StockService` trait and the HTTP catalogue client
//! - [`storage`] - `PersistentStorage` trait, SQLite and in-memory backends
//! - [`notify`] - `CartNotice` and notifiers
//! - [`config`] - Layered configuration (defaults, TOML, environment)
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rocketshoes_store::{CartStore, CartStoreOptions, HttpCatalog, StoreConfig};
//! use rocketshoes_db::{Database, DbConfig};
//!
//! let config = StoreConfig::load_or_default(None);
//! let db = Database::new(DbConfig::new(&config.storage.database_path)).await?;
//! let catalog = HttpCatalog::from_settings(&config.api)?;
//!
//! let store = CartStore::initialize(
//!     Arc::new(catalog),
//!     Arc::new(db.storage()),
//!     CartStoreOptions::default().storage_key(&config.storage.cart_key),
//! )
//! .await;
//!
//! let handle = store.start();
//! handle.add_product(1).await?;
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod notify;
pub mod storage;
pub mod store;

pub use catalog::{HttpCatalog, StockService};
pub use config::{ApiSettings, StorageSettings, StoreConfig};
pub use error::{CatalogError, StorageError, StoreError, StoreResult};
pub use notify::{CartNotice, CartNotifier, CartOperation, ChannelNotifier, NoOpNotifier};
pub use storage::{MemoryStorage, PersistentStorage};
pub use store::{CartOutcome, CartStore, CartStoreHandle, CartStoreOptions};
