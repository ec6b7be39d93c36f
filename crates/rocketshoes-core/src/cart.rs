//! # Cart Model
//!
//! The ordered, id-unique collection of products a shopper intends to buy.
//!
//! ## Cart Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Mutations                                       │
//! │                                                                         │
//! │  push(product) ─────────► entries.push({..product, amount: 1})         │
//! │                                                                         │
//! │  set_amount(id, n) ─────► entries[i].amount = n                        │
//! │                                                                         │
//! │  remove(id) ────────────► entries.remove(i)   (others keep order)      │
//! │                                                                         │
//! │  Every lookup miss is returned as CoreError::NotInCart, never a panic. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Persisted Blob
//! A cart serializes to a bare JSON array of entries with the product fields
//! flattened next to `amount`:
//!
//! ```json
//! [{"id":1,"title":"Tênis","price":179.9,"image":"https://…","amount":2}]
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Product, ProductId};
use crate::validation::validate_entries;

// =============================================================================
// Cart Entry
// =============================================================================

/// One product in the cart together with the requested quantity.
///
/// `amount` is the only field that changes after the entry is created; the
/// product fields are a snapshot taken when the product was first added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartEntry {
    /// Product snapshot.
    #[serde(flatten)]
    #[ts(flatten)]
    pub product: Product,

    /// Units requested. Always > 0.
    pub amount: i64,
}

impl CartEntry {
    /// Creates the entry for a product added for the first time.
    pub fn first_unit(product: Product) -> Self {
        CartEntry { product, amount: 1 }
    }

    /// Product id of this entry.
    #[inline]
    pub fn id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price × amount.
    pub fn line_total(&self) -> Money {
        self.product.unit_price().multiply_quantity(self.amount)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Entries are unique by product id
/// - Every amount is > 0
/// - Order is insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Builds a cart from entries, checking the invariants.
    pub fn from_entries(entries: Vec<CartEntry>) -> CoreResult<Self> {
        validate_entries(&entries)?;
        Ok(Cart { entries })
    }

    /// Decodes a persisted blob.
    ///
    /// ## Errors
    /// `CoreError::MalformedBlob` when the JSON does not parse, or
    /// `CoreError::Validation` when it parses but breaks the invariants.
    pub fn from_blob(blob: &str) -> CoreResult<Self> {
        let entries: Vec<CartEntry> = serde_json::from_str(blob)?;
        Cart::from_entries(entries)
    }

    /// Encodes the cart as the persisted blob.
    pub fn to_blob(&self) -> CoreResult<String> {
        Ok(serde_json::to_string(&self.entries)?)
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Consumes the cart and returns its entries.
    pub fn into_entries(self) -> Vec<CartEntry> {
        self.entries
    }

    /// Looks up the entry for a product.
    pub fn get(&self, id: ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    /// Amount of a product in the cart, 0 when absent.
    pub fn amount_of(&self, id: ProductId) -> i64 {
        self.get(id).map_or(0, |e| e.amount)
    }

    /// Checks whether a product is in the cart.
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Appends a product with amount 1.
    ///
    /// ## Errors
    /// `CoreError::AlreadyInCart` if an entry with the same id exists.
    pub fn push(&mut self, product: Product) -> CoreResult<()> {
        if self.contains(product.id) {
            return Err(CoreError::AlreadyInCart(product.id));
        }

        self.entries.push(CartEntry::first_unit(product));
        Ok(())
    }

    /// Sets the amount of an existing entry.
    ///
    /// ## Errors
    /// - `CoreError::NotInCart` if the product has no entry
    /// - `CoreError::Validation` if `amount` is not positive
    pub fn set_amount(&mut self, id: ProductId, amount: i64) -> CoreResult<()> {
        if amount <= 0 {
            return Err(crate::error::ValidationError::MustBePositive {
                field: "amount".to_string(),
            }
            .into());
        }

        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or(CoreError::NotInCart(id))?;

        entry.amount = amount;
        Ok(())
    }

    /// Removes the entry for a product and returns it.
    ///
    /// ## Errors
    /// `CoreError::NotInCart` if the product has no entry.
    pub fn remove(&mut self, id: ProductId) -> CoreResult<CartEntry> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id() == id)
            .ok_or(CoreError::NotInCart(id))?;

        // Vec::remove shifts, keeping the relative order of the rest
        Ok(self.entries.remove(index))
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all amounts, saturating at `i64::MAX`.
    pub fn total_quantity(&self) -> i64 {
        self.entries
            .iter()
            .fold(0i64, |total, e| total.saturating_add(e.amount))
    }

    /// Sum of all line totals, saturating like [`Money`].
    pub fn subtotal(&self) -> Money {
        self.entries.iter().map(CartEntry::line_total).sum()
    }

    /// Summary for display.
    pub fn totals(&self) -> CartTotals {
        CartTotals::from(self)
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Cart totals summary for UI responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    /// Distinct products (the header badge).
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal_cents: i64,
    /// Subtotal formatted as `R$ 1.234,50`.
    pub subtotal_display: String,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        let subtotal = cart.subtotal();
        CartTotals {
            item_count: cart.len(),
            total_quantity: cart.total_quantity(),
            subtotal_cents: subtotal.cents(),
            subtotal_display: subtotal.format_brl(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
