//! # rocketshoes-core: Pure Cart Logic
//!
//! This crate is the **heart** of the RocketShoes cart. It contains the cart
//! model and the stock admission rules as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        RocketShoes Cart                                 │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                UI (product grid, cart page, header)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ add / remove / update                  │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │           rocketshoes-store (CartStore actor)                   │   │
//! │  │     stock lookups, write-through storage, publishing            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ rocketshoes-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   cart    │  │   stock   │  │   money   │  │   │
//! │  │   │  Product  │  │   Cart    │  │ admission │  │   Money   │  │   │
//! │  │   │  Stock    │  │ CartEntry │  │   rules   │  │  R$ fmt   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Catalogue types (Product, Stock) and AmountUpdate
//! - [`cart`] - Cart and CartEntry, ordered and unique by product id
//! - [`stock`] - Stock admission rules for add and update
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use rocketshoes_core::{stock, Cart, Product, Stock};
//!
//! let mut cart = Cart::new();
//! let product = Product {
//!     id: 1,
//!     title: "Tênis de Caminhada".to_string(),
//!     price: 179.9,
//!     image: "https://example.com/1.jpg".to_string(),
//! };
//!
//! // Adding requires one more unit than is already in the cart
//! let target = stock::admit_add(cart.amount_of(1), &Stock { id: 1, amount: 5 }).unwrap();
//! assert_eq!(target, 1);
//!
//! cart.push(product).unwrap();
//! assert_eq!(cart.amount_of(1), 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartEntry, CartTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Storage key under which the serialized cart blob lives.
///
/// Carts persisted by earlier client versions are stored under this exact key,
/// so it must never change.
pub const CART_STORAGE_KEY: &str = "@RocketShoes:cart";
