//! # Stock Admission Rules
//!
//! Decides whether a requested cart amount is allowed by the stock the
//! catalogue reports.
//!
//! ## The Two Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stock Admission                                      │
//! │                                                                         │
//! │  ADD (one more unit)                UPDATE (explicit amount)            │
//! │  ───────────────────                ─────────────────────────          │
//! │  target = in_cart + 1               requested                           │
//! │  reject if target >  stock          reject if requested >= stock        │
//! │                                                                         │
//! │  stock = 3:                         stock = 3:                          │
//! │    in cart 2 → target 3  ✓            requested 2  ✓                    │
//! │    in cart 3 → target 4  ✗            requested 3  ✗                    │
//! │                                                                         │
//! │  Add can reach the stock ceiling; update cannot.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The asymmetry is long-standing storefront behaviour and is kept as is
//! until product confirms which comparison is intended.

use crate::error::{CoreError, CoreResult};
use crate::types::Stock;

/// Admits adding one unit to a product already present `in_cart` times
/// (0 when absent).
///
/// ## Returns
/// The new target amount.
///
/// ## Example
/// ```rust
/// use rocketshoes_core::{stock::admit_add, Stock};
///
/// let stock = Stock { id: 1, amount: 1 };
/// assert_eq!(admit_add(0, &stock), Ok(1));
/// assert!(admit_add(1, &stock).is_err());
/// ```
pub fn admit_add(in_cart: i64, stock: &Stock) -> CoreResult<i64> {
    let out_of_stock = |requested| CoreError::OutOfStock {
        product_id: stock.id,
        requested,
        available: stock.amount,
    };

    // No stock level can admit one more than i64::MAX
    let target = in_cart.checked_add(1).ok_or_else(|| out_of_stock(in_cart))?;

    if target > stock.amount {
        return Err(out_of_stock(target));
    }

    Ok(target)
}

/// Admits setting a product's amount to `requested`.
///
/// Callers filter non-positive amounts before asking for stock; this rule
/// only compares against the stock level.
///
/// ## Example
/// ```rust
/// use rocketshoes_core::{stock::admit_update, Stock};
///
/// let stock = Stock { id: 3, amount: 10 };
/// assert!(admit_update(9, &stock).is_ok());
/// assert!(admit_update(10, &stock).is_err());
/// ```
pub fn admit_update(requested: i64, stock: &Stock) -> CoreResult<()> {
    // Rejects at the stock level itself, unlike admit_add
    if requested >= stock.amount {
        return Err(CoreError::OutOfStock {
            product_id: stock.id,
            requested,
            available: stock.amount,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
