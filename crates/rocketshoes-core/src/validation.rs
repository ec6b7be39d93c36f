//! # Validation Module
//!
//! Input validation for cart operations and persisted carts.
//!
//! ## Usage
//! ```rust
//! use rocketshoes_core::validation::validate_product_id;
//!
//! assert!(validate_product_id(1).is_ok());
//! assert!(validate_product_id(0).is_err());
//! ```

use std::collections::HashSet;

use crate::cart::CartEntry;
use crate::error::ValidationError;
use crate::types::ProductId;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a product identifier.
///
/// ## Rules
/// - Must be positive (the catalogue numbers products from 1)
pub fn validate_product_id(id: ProductId) -> ValidationResult<()> {
    if id == 0 {
        return Err(ValidationError::MustBePositive {
            field: "product id".to_string(),
        });
    }

    Ok(())
}

/// Validates entries decoded from a persisted blob.
///
/// ## Rules
/// - Every amount is positive
/// - Ids are unique
///
/// A blob that breaks either rule did not come from this store, so callers
/// treat it like any other malformed blob.
pub fn validate_entries(entries: &[CartEntry]) -> ValidationResult<()> {
    let mut seen = HashSet::with_capacity(entries.len());

    for entry in entries {
        if entry.amount <= 0 {
            return Err(ValidationError::MustBePositive {
                field: format!("amount of product {}", entry.product.id),
            });
        }

        if !seen.insert(entry.product.id) {
            return Err(ValidationError::Duplicate {
                field: "product id".to_string(),
                value: entry.product.id.to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Product;

    fn entry(id: ProductId, amount: i64) -> CartEntry {
        CartEntry {
            product: Product {
                id,
                title: format!("Product {}", id),
                price: 10.0,
                image: String::new(),
            },
            amount,
        }
    }

    #[test]
    fn test_validate_product_id() {
        assert!(validate_product_id(1).is_ok());
        assert!(validate_product_id(u64::MAX).is_ok());
        assert!(validate_product_id(0).is_err());
    }

    #[test]
    fn test_validate_entries() {
        assert!(validate_entries(&[]).is_ok());
        assert!(validate_entries(&[entry(1, 1), entry(2, 5)]).is_ok());

        assert!(matches!(
            validate_entries(&[entry(1, 0)]),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            validate_entries(&[entry(1, 1), entry(1, 2)]),
            Err(ValidationError::Duplicate { .. })
        ));
    }
}
