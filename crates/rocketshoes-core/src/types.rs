//! # Catalogue Types
//!
//! The product and stock records served by the catalogue API.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Catalogue Types                                 │
//! │                                                                         │
//! │  ┌─────────────────────┐             ┌─────────────────────┐           │
//! │  │      Product        │             │       Stock         │           │
//! │  │  ─────────────────  │             │  ─────────────────  │           │
//! │  │  id (integer)       │◄────────────│  id (integer)       │           │
//! │  │  title              │   same id   │  amount             │           │
//! │  │  price (decimal)    │             └─────────────────────┘           │
//! │  │  image (URL)        │                                                │
//! │  └─────────────────────┘                                                │
//! │                                                                         │
//! │  GET /products/{id} → Product          GET /stock/{id} → Stock         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The schema is owned by the catalogue, so these structs mirror its JSON
//! exactly and carry no invariants of their own.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// Identifier shared by a product, its stock record and its cart entry.
pub type ProductId = u64;

// =============================================================================
// Product
// =============================================================================

/// A product as returned by the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Catalogue identifier.
    pub id: ProductId,

    /// Display name.
    pub title: String,

    /// Unit price in reais, as a decimal number (e.g. `179.9`).
    pub price: f64,

    /// Product image URL.
    pub image: String,
}

impl Product {
    /// Returns the unit price as a Money value.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_price(self.price)
    }
}

// =============================================================================
// Stock
// =============================================================================

/// Units of a product currently available for purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Stock {
    /// Product this stock record belongs to.
    pub id: ProductId,

    /// Units available.
    pub amount: i64,
}

// =============================================================================
// Amount Update
// =============================================================================

/// Request to set a cart entry's amount, as sent by the cart page's
/// quantity buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AmountUpdate {
    pub product_id: ProductId,

    /// Desired amount. Values <= 0 are ignored by the store.
    pub amount: i64,
}

impl AmountUpdate {
    pub fn new(product_id: ProductId, amount: i64) -> Self {
        AmountUpdate { product_id, amount }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserializes_catalogue_json() {
        let json = r#"{"id":3,"title":"Tênis Adidas Duramo Lite 2.0","price":219.9,"image":"https://example.com/3.jpg"}"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.id, 3);
        assert_eq!(product.unit_price().cents(), 21990);
    }

    #[test]
    fn test_stock_deserializes_catalogue_json() {
        let stock: Stock = serde_json::from_str(r#"{"id":1,"amount":3}"#).unwrap();
        assert_eq!(stock, Stock { id: 1, amount: 3 });
    }

    #[test]
    fn test_amount_update_uses_camel_case() {
        let update: AmountUpdate =
            serde_json::from_str(r#"{"productId":3,"amount":9}"#).unwrap();
        assert_eq!(update, AmountUpdate::new(3, 9));
    }
}
