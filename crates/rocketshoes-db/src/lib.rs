//! # rocketshoes-db: Local Storage for the RocketShoes Cart
//!
//! A small key/value store on top of SQLite. The cart store keeps its
//! persisted blob here under a stable key, so a restarted client finds the
//! cart where the shopper left it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        RocketShoes Data Flow                            │
//! │                                                                         │
//! │  CartStore (rocketshoes-store)                                         │
//! │       │  write("@RocketShoes:cart", "[{...}]")                         │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  rocketshoes-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repository   │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│ (storage.rs)  │    │  (embedded)  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file: <data dir>/cart.db                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rocketshoes_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("cart.db")).await?;
//!
//! db.storage().write("@RocketShoes:cart", "[]").await?;
//! let blob = db.storage().read("@RocketShoes:cart").await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::storage::StorageRepository;
