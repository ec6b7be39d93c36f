//! # Storage Repository
//!
//! Key/value persistence for opaque string blobs.
//!
//! ```text
//! storage_entries
//! ┌─────────────────────┬──────────────────────────────┬─────────────────────┐
//! │ key (PK)            │ value                        │ updated_at          │
//! ├─────────────────────┼──────────────────────────────┼─────────────────────┤
//! │ @RocketShoes:cart   │ [{"id":1,...,"amount":2}]    │ 2026-10-18T12:00Z   │
//! └─────────────────────┴──────────────────────────────┴─────────────────────┘
//! ```
//!
//! A write replaces the whole value in one statement, so a reader sees
//! either the old blob or the new one.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Repository for key/value storage.
#[derive(Debug, Clone)]
pub struct StorageRepository {
    pool: SqlitePool,
}

impl StorageRepository {
    /// Creates a new StorageRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StorageRepository { pool }
    }

    /// Reads the value stored under `key`.
    ///
    /// ## Returns
    /// * `Ok(None)` - Nothing stored under this key
    /// * `Ok(Some(value))` - The stored value, verbatim
    pub async fn read(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM storage_entries WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        debug!(key = %key, found = value.is_some(), "Storage read");
        Ok(value)
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub async fn write(&self, key: &str, value: &str) -> DbResult<()> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO storage_entries (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        debug!(key = %key, bytes = value.len(), "Storage write");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
