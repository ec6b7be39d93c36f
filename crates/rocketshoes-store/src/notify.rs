//! # Cart Notices
//!
//! User-facing messages emitted when a cart operation does not commit.
//!
//! ## Notice Selection
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Failure → Notice                                     │
//! │                                                                         │
//! │  Operation   OutOfStock rule hit      anything else (lookup, storage,  │
//! │                                       not in cart, bad response)        │
//! │  ─────────   ───────────────────      ──────────────────────────────   │
//! │  add         OutOfStock               AddFailed                         │
//! │  remove      (no stock check)         RemoveFailed                      │
//! │  update      OutOfStock               UpdateFailed                      │
//! │                                                                         │
//! │  update with amount <= 0 → no notice at all                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Success has no notice; subscribers see the newly published cart instead.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;
use ts_rs::TS;

use crate::error::StoreError;

// =============================================================================
// Cart Notice
// =============================================================================

/// A toast-style message for the shopper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CartNotice {
    /// The requested amount exceeds what the catalogue has in stock.
    OutOfStock,
    /// Adding a product failed.
    AddFailed,
    /// Removing a product failed.
    RemoveFailed,
    /// Changing a product's amount failed.
    UpdateFailed,
}

impl CartNotice {
    /// The message shown to the shopper.
    pub fn message(&self) -> &'static str {
        match self {
            CartNotice::OutOfStock => "Quantidade solicitada fora de estoque",
            CartNotice::AddFailed => "Erro na adição do produto",
            CartNotice::RemoveFailed => "Erro na remoção do produto",
            CartNotice::UpdateFailed => "Erro na alteração de quantidade do produto",
        }
    }

    /// Picks the notice for a failed operation.
    pub fn for_failure(operation: CartOperation, err: &StoreError) -> Self {
        if err.is_out_of_stock() {
            CartNotice::OutOfStock
        } else {
            operation.failure_notice()
        }
    }
}

impl fmt::Display for CartNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

// =============================================================================
// Cart Operation
// =============================================================================

/// The three cart mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOperation {
    Add,
    Remove,
    Update,
}

impl CartOperation {
    /// Generic notice when this operation fails for a reason other than stock.
    pub fn failure_notice(&self) -> CartNotice {
        match self {
            CartOperation::Add => CartNotice::AddFailed,
            CartOperation::Remove => CartNotice::RemoveFailed,
            CartOperation::Update => CartNotice::UpdateFailed,
        }
    }
}

impl fmt::Display for CartOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartOperation::Add => write!(f, "add"),
            CartOperation::Remove => write!(f, "remove"),
            CartOperation::Update => write!(f, "update"),
        }
    }
}

// =============================================================================
// Notifier Trait
// =============================================================================

/// Trait for delivering notices to whatever shows them.
pub trait CartNotifier: Send + Sync {
    /// Delivers one notice.
    fn notify(&self, notice: CartNotice);
}

/// No-op notifier for headless use and tests.
pub struct NoOpNotifier;

impl CartNotifier for NoOpNotifier {
    fn notify(&self, _notice: CartNotice) {}
}

/// Fans notices out to any number of subscribers.
///
/// ## Usage
/// ```rust,ignore
/// let notifier = Arc::new(ChannelNotifier::new(16));
/// let mut notices = notifier.subscribe();
///
/// tokio::spawn(async move {
///     while let Ok(notice) = notices.recv().await {
///         show_toast(notice.message());
///     }
/// });
/// ```
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: broadcast::Sender<CartNotice>,
}

impl ChannelNotifier {
    /// Creates a notifier buffering up to `capacity` notices per slow subscriber.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        ChannelNotifier { tx }
    }

    /// Subscribes to notices emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<CartNotice> {
        self.tx.subscribe()
    }
}

impl Default for ChannelNotifier {
    fn default() -> Self {
        ChannelNotifier::new(16)
    }
}

impl CartNotifier for ChannelNotifier {
    fn notify(&self, notice: CartNotice) {
        // No subscribers is fine
        let _ = self.tx.send(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocketshoes_core::CoreError;

    #[test]
    fn test_messages() {
        assert_eq!(
            CartNotice::OutOfStock.to_string(),
            "Quantidade solicitada fora de estoque"
        );
        assert_eq!(CartNotice::AddFailed.message(), "Erro na adição do produto");
        assert_eq!(CartNotice::RemoveFailed.message(), "Erro na remoção do produto");
        assert_eq!(
            CartNotice::UpdateFailed.message(),
            "Erro na alteração de quantidade do produto"
        );
    }

    #[test]
    fn test_for_failure() {
        let out_of_stock = StoreError::from(CoreError::OutOfStock {
            product_id: 1,
            requested: 2,
            available: 1,
        });
        let not_found = StoreError::from(CoreError::NotInCart(1));

        assert_eq!(
            CartNotice::for_failure(CartOperation::Add, &out_of_stock),
            CartNotice::OutOfStock
        );
        assert_eq!(
            CartNotice::for_failure(CartOperation::Update, &not_found),
            CartNotice::UpdateFailed
        );
        assert_eq!(
            CartNotice::for_failure(CartOperation::Remove, &not_found),
            CartNotice::RemoveFailed
        );
    }

    #[test]
    fn test_serializes_as_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&CartNotice::OutOfStock).unwrap(),
            r#""OUT_OF_STOCK""#
        );
    }

    #[tokio::test]
    async fn test_channel_notifier_fans_out() {
        let notifier = ChannelNotifier::default();
        let mut first = notifier.subscribe();
        let mut second = notifier.subscribe();

        notifier.notify(CartNotice::AddFailed);

        assert_eq!(first.recv().await.unwrap(), CartNotice::AddFailed);
        assert_eq!(second.recv().await.unwrap(), CartNotice::AddFailed);
    }

    #[test]
    fn test_channel_notifier_without_subscribers() {
        ChannelNotifier::new(1).notify(CartNotice::RemoveFailed);
    }
}
