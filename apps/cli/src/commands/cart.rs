//! # Cart Commands
//!
//! `show`, `add`, `remove` and `update` against a running cart store.
//!
//! ## Output
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  $ rocketshoes add 1                                                    │
//! │  {                                                                      │
//! │    "items": [                                                           │
//! │      { "id": 1, "title": "Tênis…", "price": 179.9, "image": "…",       │
//! │        "amount": 1 }                                                    │
//! │    ],                                                                   │
//! │    "totals": { "itemCount": 1, "totalQuantity": 1,                      │
//! │                "subtotalCents": 17990, "subtotalDisplay": "R$ 179,90" } │
//! │  }                                                                      │
//! │                                                                         │
//! │  A rejected operation prints the unchanged cart plus                    │
//! │  "notice": { "code": "OUT_OF_STOCK", "message": "Quantidade…" }         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rocketshoes_core::{AmountUpdate, Cart, CartEntry, CartTotals, ProductId};
use rocketshoes_store::{CartNotice, CartOutcome, CartStoreHandle};
use serde::Serialize;
use tracing::debug;

use crate::error::CliResult;

/// Cart response including items and totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartEntry>,
    pub totals: CartTotals,

    /// Present when the command was rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<NoticeResponse>,
}

/// A notice as printed for scripts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticeResponse {
    pub code: CartNotice,
    pub message: &'static str,
}

impl From<CartNotice> for NoticeResponse {
    fn from(notice: CartNotice) -> Self {
        NoticeResponse {
            code: notice,
            message: notice.message(),
        }
    }
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            items: cart.entries().to_vec(),
            totals: cart.totals(),
            notice: None,
        }
    }
}

impl CartResponse {
    fn with_outcome(cart: &Cart, outcome: CartOutcome) -> Self {
        let mut response = CartResponse::from(cart);
        response.notice = outcome.notice().map(NoticeResponse::from);
        response
    }

    /// True when the command was rejected.
    pub fn is_rejected(&self) -> bool {
        self.notice.is_some()
    }
}

/// Prints the current cart.
pub fn show_cart(cart: &CartStoreHandle) -> CartResponse {
    debug!("show command");
    CartResponse::from(&cart.cart())
}

/// Adds one unit of a product.
pub async fn add_product(cart: &CartStoreHandle, product_id: ProductId) -> CliResult<CartResponse> {
    debug!(product_id = %product_id, "add command");

    let outcome = cart.add_product(product_id).await?;
    Ok(CartResponse::with_outcome(&cart.cart(), outcome))
}

/// Removes a product from the cart.
pub async fn remove_product(
    cart: &CartStoreHandle,
    product_id: ProductId,
) -> CliResult<CartResponse> {
    debug!(product_id = %product_id, "remove command");

    let outcome = cart.remove_product(product_id).await?;
    Ok(CartResponse::with_outcome(&cart.cart(), outcome))
}

/// Sets a product's amount.
pub async fn update_product_amount(
    cart: &CartStoreHandle,
    product_id: ProductId,
    amount: i64,
) -> CliResult<CartResponse> {
    debug!(product_id = %product_id, amount = %amount, "update command");

    let outcome = cart
        .update_product_amount(AmountUpdate::new(product_id, amount))
        .await?;
    Ok(CartResponse::with_outcome(&cart.cart(), outcome))
}
