//! # Commands Module
//!
//! One function per subcommand; `lib.rs` parses arguments and prints.
//!
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── cart.rs     ◄─── show, add, remove, update
//! └── config.rs   ◄─── config
//! ```
//!
//! Cart commands take a `&CartStoreHandle` and return a `CartResponse`;
//! nothing here touches the database directly.

pub mod cart;
pub mod config;
