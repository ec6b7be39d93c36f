//! # Repository Module
//!
//! SQL lives in repositories; callers get one from [`crate::Database`]:
//!
//! ```text
//! db.storage().write(key, value)
//!       │
//!       ▼
//! StorageRepository ──► INSERT ... ON CONFLICT(key) DO UPDATE
//!       │
//!       ▼
//! SQLite
//! ```
//!
//! - [`storage::StorageRepository`] - Key/value blobs

pub mod storage;
