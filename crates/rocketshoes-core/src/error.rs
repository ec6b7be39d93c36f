//! # Error Types
//!
//! Domain-specific error types for rocketshoes-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  rocketshoes-core errors (this file)                                   │
//! │  ├── CoreError        - Cart rule violations                           │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  rocketshoes-db errors (separate crate)                                │
//! │  └── DbError          - Storage failures                               │
//! │                                                                         │
//! │  rocketshoes-store errors (separate crate)                             │
//! │  └── StoreError       - Lookup / storage / lifecycle failures          │
//! │                                                                         │
//! │  Flow: CoreError / StoreError → CartNotice → user                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, amounts)
//! 3. Lookups return these as values; nothing panics or unwinds to signal
//!    "not in cart"

use thiserror::Error;

use crate::types::ProductId;

// =============================================================================
// Core Error
// =============================================================================

/// Cart rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The requested amount is not admitted by the available stock.
    ///
    /// ## User Workflow
    /// ```text
    /// Click "+" (cart has 3, stock is 3)
    ///      │
    ///      ▼
    /// admit_add(3, stock=3) → target 4 > 3
    ///      │
    ///      ▼
    /// OutOfStock { product_id, requested: 4, available: 3 }
    ///      │
    ///      ▼
    /// Toast: "Quantidade solicitada fora de estoque"
    /// ```
    #[error("Product {product_id} out of stock: requested {requested}, available {available}")]
    OutOfStock {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// The operation targets a product that is not in the cart.
    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),

    /// The product is already in the cart (a second entry would break
    /// uniqueness by id).
    #[error("Product {0} is already in the cart")]
    AlreadyInCart(ProductId),

    /// The persisted cart blob could not be decoded or encoded.
    #[error("Malformed cart blob: {0}")]
    MalformedBlob(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Duplicate value in a collection that must be unique.
    #[error("{field} '{value}' appears more than once")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::MalformedBlob(err.to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::OutOfStock {
            product_id: 7,
            requested: 4,
            available: 3,
        };
        assert_eq!(
            err.to_string(),
            "Product 7 out of stock: requested 4, available 3"
        );

        assert_eq!(
            CoreError::NotInCart(2).to_string(),
            "Product 2 is not in the cart"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "product id".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
