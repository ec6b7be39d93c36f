//! # CLI Error Type
//!
//! Unified error type for commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the CLI                                │
//! │                                                                         │
//! │  Cart rejections (out of stock, not in cart, lookup failed)            │
//! │      → NOT errors: the store emits a notice and the command prints     │
//! │        the unchanged cart with that notice                              │
//! │                                                                         │
//! │  Everything else                                                        │
//! │      StoreError / DbError ──► CliError { code, message } ──► stdout    │
//! │                                                    exit status 1        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ```json
//! { "code": "CONFIG_ERROR", "message": "Invalid catalogue URL: relative URL without a base" }
//! ```

use rocketshoes_db::DbError;
use rocketshoes_store::StoreError;
use serde::Serialize;
use thiserror::Error;

/// Error printed by a failed command.
#[derive(Debug, Clone, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("[{code:?}] {message}")]
pub struct CliError {
    /// Machine-readable error code for scripts
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for command output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Configuration could not be loaded, validated or saved
    ConfigError,

    /// Local database failed
    DatabaseError,

    /// The cart store stopped before answering
    StoreStopped,

    /// Anything else
    Internal,
}

/// Result type for commands.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Creates a new CLI error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to CLI errors.
impl From<DbError> for CliError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::MigrationFailed(e) => {
                tracing::error!("Migration failed: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            other => CliError::new(ErrorCode::DatabaseError, other.to_string()),
        }
    }
}

/// Converts store errors to CLI errors.
impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        if err.is_config_error() {
            return CliError::new(ErrorCode::ConfigError, err.to_string());
        }

        match err {
            StoreError::ShuttingDown | StoreError::ChannelError(_) => {
                CliError::new(ErrorCode::StoreStopped, err.to_string())
            }
            StoreError::Storage(_) => CliError::new(ErrorCode::DatabaseError, err.to_string()),
            other => {
                tracing::error!("Unexpected store error: {}", other);
                CliError::internal(other.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_codes() {
        assert_eq!(
            CliError::from(StoreError::InvalidConfig("bad".into())).code,
            ErrorCode::ConfigError
        );
        assert_eq!(
            CliError::from(StoreError::ShuttingDown).code,
            ErrorCode::StoreStopped
        );
        assert_eq!(
            CliError::from(DbError::PoolExhausted).code,
            ErrorCode::DatabaseError
        );
    }

    #[test]
    fn test_serializes_for_scripts() {
        let err = CliError::new(ErrorCode::StoreStopped, "gone");
        assert_eq!(
            serde_json::to_string(&err).unwrap(),
            r#"{"code":"STORE_STOPPED","message":"gone"}"#
        );
    }
}
