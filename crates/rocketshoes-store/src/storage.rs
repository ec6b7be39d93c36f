//! # Persistent Storage
//!
//! The key/value contract the cart store persists through, plus its two
//! implementations.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  PersistentStorage implementations                      │
//! │                                                                         │
//! │  StorageRepository (rocketshoes-db)     MemoryStorage                   │
//! │  ──────────────────────────────────     ─────────────                   │
//! │  SQLite `storage_entries` table         HashMap behind a RwLock         │
//! │  Survives restarts                      Lives as long as the process    │
//! │  Used by the CLI                        Used by tests, demos            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use rocketshoes_db::StorageRepository;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::StorageError;

/// A key/value store that survives restarts.
///
/// Values are opaque strings; the cart store decides what goes in them.
#[async_trait]
pub trait PersistentStorage: Send + Sync {
    /// Returns the value under `key`, or `None` if nothing was written.
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

#[async_trait]
impl PersistentStorage for StorageRepository {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(StorageRepository::read(self, key).await?)
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Ok(StorageRepository::write(self, key, value).await?)
    }
}

// =============================================================================
// In-Memory Storage
// =============================================================================

/// Process-local storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage pre-filled with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        MemoryStorage {
            entries: RwLock::new(entries),
        }
    }

    /// Returns a copy of the value under `key`.
    pub async fn get(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }
}

#[async_trait]
impl PersistentStorage for MemoryStorage {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.get(key).await)
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
