//! # Cart Store
//!
//! Owns the cart, runs the three mutations and publishes every committed
//! cart.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       One Cart Mutation                                 │
//! │                                                                         │
//! │  handle.add_product(1)                                                  │
//! │       │  (mpsc, queued behind any earlier command)                      │
//! │       ▼                                                                 │
//! │  CartStore task                                                         │
//! │       │                                                                 │
//! │       ├─► candidate = cart.clone()                                      │
//! │       ├─► StockService::get_stock(1)          (await)                   │
//! │       ├─► admit_add / admit_update            (rocketshoes-core)        │
//! │       ├─► StockService::get_product(1)        (add, new product only)   │
//! │       ├─► mutate candidate                                              │
//! │       ├─► PersistentStorage::write(key, blob) (await)                   │
//! │       ├─► cart = candidate                                              │
//! │       └─► watch::send(cart)                   → subscribers             │
//! │                                                                         │
//! │  Any failure before the swap drops the candidate: memory, storage and   │
//! │  subscribers all keep the previous cart, and a CartNotice is emitted.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Single Writer
//! The task handles one command at a time. A second `add_product(1)` sent
//! while the first is still waiting on the stock service is queued and sees
//! the cart the first one committed, so concurrent adds never overwrite
//! each other.
//!
//! ## Usage
//! ```rust,ignore
//! let store = CartStore::initialize(catalog, storage, CartStoreOptions::default()).await;
//! let handle = store.start();
//!
//! let mut carts = handle.subscribe();
//! handle.add_product(1).await?;
//! carts.changed().await?;
//! ```

use rocketshoes_core::stock::{admit_add, admit_update};
use rocketshoes_core::validation::validate_product_id;
use rocketshoes_core::{AmountUpdate, Cart, CoreError, ProductId, CART_STORAGE_KEY};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use crate::catalog::StockService;
use crate::error::{CatalogError, StoreError, StoreResult};
use crate::notify::{CartNotice, CartNotifier, CartOperation, NoOpNotifier};
use crate::storage::PersistentStorage;

// =============================================================================
// Outcome
// =============================================================================

/// What a mutation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOutcome {
    /// The new cart was persisted and published.
    Committed,
    /// Nothing to do (update with amount <= 0). No notice was emitted.
    Ignored,
    /// The cart is unchanged and this notice was emitted.
    Rejected(CartNotice),
}

impl CartOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, CartOutcome::Committed)
    }

    /// The emitted notice, if any.
    pub fn notice(&self) -> Option<CartNotice> {
        match self {
            CartOutcome::Rejected(notice) => Some(*notice),
            _ => None,
        }
    }
}

// =============================================================================
// Options
// =============================================================================

/// Store settings that are not collaborators.
#[derive(Clone)]
pub struct CartStoreOptions {
    /// Storage key for the cart blob.
    pub storage_key: String,

    /// Where notices go.
    pub notifier: Arc<dyn CartNotifier>,
}

impl CartStoreOptions {
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn CartNotifier>) -> Self {
        self.notifier = notifier;
        self
    }
}

impl Default for CartStoreOptions {
    fn default() -> Self {
        CartStoreOptions {
            storage_key: CART_STORAGE_KEY.to_string(),
            notifier: Arc::new(NoOpNotifier),
        }
    }
}

// =============================================================================
// Cart Store
// =============================================================================

/// The cart and everything needed to mutate it.
///
/// Methods take `&mut self`, so a store used directly is already
/// single-writer. [`CartStore::start`] moves it onto a task for callers that
/// need to share it.
pub struct CartStore {
    cart: Cart,
    stock: Arc<dyn StockService>,
    storage: Arc<dyn PersistentStorage>,
    notifier: Arc<dyn CartNotifier>,
    storage_key: String,
    cart_tx: watch::Sender<Cart>,
}

impl CartStore {
    /// Restores the persisted cart and builds the store.
    ///
    /// An absent blob, a malformed blob and a failing read all give an empty
    /// cart. This is the only time the store reads storage.
    pub async fn initialize(
        stock: Arc<dyn StockService>,
        storage: Arc<dyn PersistentStorage>,
        options: CartStoreOptions,
    ) -> Self {
        let cart = match storage.read(&options.storage_key).await {
            Ok(Some(blob)) => match Cart::from_blob(&blob) {
                Ok(cart) => cart,
                Err(e) => {
                    warn!(key = %options.storage_key, error = %e, "Discarding unreadable cart");
                    Cart::new()
                }
            },
            Ok(None) => {
                debug!(key = %options.storage_key, "No persisted cart");
                Cart::new()
            }
            Err(e) => {
                warn!(key = %options.storage_key, error = %e, "Failed to read persisted cart");
                Cart::new()
            }
        };

        info!(items = cart.len(), "Cart store initialized");

        let (cart_tx, _) = watch::channel(cart.clone());

        CartStore {
            cart,
            stock,
            storage,
            notifier: options.notifier,
            storage_key: options.storage_key,
            cart_tx,
        }
    }

    /// The current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Subscribes to committed carts. The receiver starts at the current cart.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.cart_tx.subscribe()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds one unit of a product.
    ///
    /// A product already in the cart is admitted while its new amount stays
    /// within stock; a new product is fetched and appended with amount 1.
    pub async fn add_product(&mut self, product_id: ProductId) -> CartOutcome {
        let result = match self.prepare_add(product_id).await {
            Ok(candidate) => self.commit(candidate).await,
            Err(e) => Err(e),
        };

        self.finish(CartOperation::Add, product_id, result)
    }

    /// Removes a product's entry.
    pub async fn remove_product(&mut self, product_id: ProductId) -> CartOutcome {
        let mut candidate = self.cart.clone();
        let result = match candidate.remove(product_id) {
            Ok(_) => self.commit(candidate).await,
            Err(e) => Err(e.into()),
        };

        self.finish(CartOperation::Remove, product_id, result)
    }

    /// Sets a product's amount.
    ///
    /// `amount <= 0` is ignored: no lookup, no write, no notice.
    pub async fn update_product_amount(&mut self, update: AmountUpdate) -> CartOutcome {
        let AmountUpdate { product_id, amount } = update;

        if amount <= 0 {
            debug!(product_id = %product_id, amount, "Ignoring non-positive amount");
            return CartOutcome::Ignored;
        }

        let result = match self.prepare_update(product_id, amount).await {
            Ok(candidate) => self.commit(candidate).await,
            Err(e) => Err(e),
        };

        self.finish(CartOperation::Update, product_id, result)
    }

    async fn prepare_add(&self, product_id: ProductId) -> StoreResult<Cart> {
        validate_product_id(product_id).map_err(CoreError::from)?;

        let mut candidate = self.cart.clone();
        let in_cart = candidate.amount_of(product_id);

        let stock = self.stock.get_stock(product_id).await?;
        let target = admit_add(in_cart, &stock)?;

        if in_cart > 0 {
            candidate.set_amount(product_id, target)?;
        } else {
            let product = self.stock.get_product(product_id).await?;
            if product.id != product_id {
                return Err(CatalogError::Parse(format!(
                    "asked for product {}, got {}",
                    product_id, product.id
                ))
                .into());
            }
            candidate.push(product)?;
        }

        Ok(candidate)
    }

    async fn prepare_update(&self, product_id: ProductId, amount: i64) -> StoreResult<Cart> {
        let stock = self.stock.get_stock(product_id).await?;
        admit_update(amount, &stock)?;

        let mut candidate = self.cart.clone();
        candidate.set_amount(product_id, amount)?;

        Ok(candidate)
    }

    /// Persists `candidate`, then makes it the current cart and publishes it.
    async fn commit(&mut self, candidate: Cart) -> StoreResult<()> {
        let blob = candidate.to_blob()?;
        self.storage.write(&self.storage_key, &blob).await?;

        self.cart = candidate;
        self.cart_tx.send_replace(self.cart.clone());
        Ok(())
    }

    fn finish(
        &self,
        operation: CartOperation,
        product_id: ProductId,
        result: StoreResult<()>,
    ) -> CartOutcome {
        match result {
            Ok(()) => {
                info!(
                    operation = %operation,
                    product_id = %product_id,
                    items = self.cart.len(),
                    "Cart committed"
                );
                CartOutcome::Committed
            }
            Err(err) => {
                let notice = CartNotice::for_failure(operation, &err);
                warn!(
                    operation = %operation,
                    product_id = %product_id,
                    error = %err,
                    transient = err.is_transient(),
                    notice = ?notice,
                    "Cart operation rejected"
                );
                self.notifier.notify(notice);
                CartOutcome::Rejected(notice)
            }
        }
    }

    // =========================================================================
    // Task
    // =========================================================================

    /// Moves the store onto its own task and returns a handle to it.
    pub fn start(self) -> CartStoreHandle {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let cart_rx = self.cart_tx.subscribe();

        tokio::spawn(async move {
            self.run(cmd_rx).await;
        });

        CartStoreHandle { cmd_tx, cart_rx }
    }

    async fn run(mut self, mut cmd_rx: mpsc::Receiver<CartCommand>) {
        info!("Cart store task started");

        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                CartCommand::Add { product_id, reply } => {
                    let outcome = self.add_product(product_id).await;
                    let _ = reply.send(outcome);
                }
                CartCommand::Remove { product_id, reply } => {
                    let outcome = self.remove_product(product_id).await;
                    let _ = reply.send(outcome);
                }
                CartCommand::Update { update, reply } => {
                    let outcome = self.update_product_amount(update).await;
                    let _ = reply.send(outcome);
                }
                CartCommand::Shutdown => {
                    info!("Cart store shutting down");
                    break;
                }
            }
        }

        debug!("Cart store task stopped");
    }
}

// =============================================================================
// Handle
// =============================================================================

/// Commands processed by the store task, in arrival order.
#[derive(Debug)]
enum CartCommand {
    Add {
        product_id: ProductId,
        reply: oneshot::Sender<CartOutcome>,
    },
    Remove {
        product_id: ProductId,
        reply: oneshot::Sender<CartOutcome>,
    },
    Update {
        update: AmountUpdate,
        reply: oneshot::Sender<CartOutcome>,
    },
    Shutdown,
}

/// Cloneable handle to a running [`CartStore`].
///
/// Operation failures come back as [`CartOutcome::Rejected`]; `Err` only
/// means the store task is gone.
#[derive(Clone)]
pub struct CartStoreHandle {
    cmd_tx: mpsc::Sender<CartCommand>,
    cart_rx: watch::Receiver<Cart>,
}

impl CartStoreHandle {
    /// Snapshot of the last committed cart.
    pub fn cart(&self) -> Cart {
        self.cart_rx.borrow().clone()
    }

    /// Subscribes to committed carts.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.cart_rx.clone()
    }

    /// Queues an add.
    pub async fn add_product(&self, product_id: ProductId) -> StoreResult<CartOutcome> {
        self.request(|reply| CartCommand::Add { product_id, reply })
            .await
    }

    /// Queues a remove.
    pub async fn remove_product(&self, product_id: ProductId) -> StoreResult<CartOutcome> {
        self.request(|reply| CartCommand::Remove { product_id, reply })
            .await
    }

    /// Queues an amount update.
    pub async fn update_product_amount(&self, update: AmountUpdate) -> StoreResult<CartOutcome> {
        self.request(|reply| CartCommand::Update { update, reply })
            .await
    }

    /// Stops the store after the commands already queued.
    pub async fn shutdown(&self) -> StoreResult<()> {
        self.cmd_tx
            .send(CartCommand::Shutdown)
            .await
            .map_err(|_| StoreError::ChannelError("Cart command channel closed".into()))
    }

    async fn request(
        &self,
        command: impl FnOnce(oneshot::Sender<CartOutcome>) -> CartCommand,
    ) -> StoreResult<CartOutcome> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.cmd_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| StoreError::ChannelError("Cart command channel closed".into()))?;

        reply_rx.await.map_err(|_| StoreError::ShuttingDown)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::notify::ChannelNotifier;
    use crate::storage::MemoryStorage;
    use async_trait::async_trait;
    use rocketshoes_core::{CartEntry, Product, Stock};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use tokio::sync::broadcast;

    const KEY: &str = "@RocketShoes:cart";

    // -------------------------------------------------------------------------
    // Fakes
    // -------------------------------------------------------------------------

    #[derive(Default)]
    struct FakeCatalog {
        stock: HashMap<ProductId, i64>,
        delay: Option<Duration>,
        failing: AtomicBool,
    }

    impl FakeCatalog {
        fn with_stock(stock: &[(ProductId, i64)]) -> Self {
            FakeCatalog {
                stock: stock.iter().copied().collect(),
                ..Default::default()
            }
        }

        fn slow(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        async fn lookup(&self, product_id: ProductId) -> Result<i64, CatalogError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.failing.load(Ordering::SeqCst) {
                return Err(CatalogError::Unavailable("connection reset".into()));
            }
            self.stock
                .get(&product_id)
                .copied()
                .ok_or(CatalogError::NotFound(product_id))
        }
    }

    #[async_trait]
    impl StockService for FakeCatalog {
        async fn get_stock(&self, product_id: ProductId) -> Result<Stock, CatalogError> {
            let amount = self.lookup(product_id).await?;
            Ok(Stock {
                id: product_id,
                amount,
            })
        }

        async fn get_product(&self, product_id: ProductId) -> Result<Product, CatalogError> {
            self.lookup(product_id).await?;
            Ok(product(product_id))
        }
    }

    /// Storage whose writes always fail.
    struct ReadOnlyStorage(MemoryStorage);

    #[async_trait]
    impl PersistentStorage for ReadOnlyStorage {
        async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.read(key).await
        }

        async fn write(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("disk full".into()))
        }
    }

    /// Storage whose reads always fail.
    struct UnreadableStorage;

    #[async_trait]
    impl PersistentStorage for UnreadableStorage {
        async fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("locked".into()))
        }

        async fn write(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    fn product(id: ProductId) -> Product {
        Product {
            id,
            title: format!("Tênis {}", id),
            price: 139.9,
            image: format!("https://example.com/{}.jpg", id),
        }
    }

    fn blob(entries: &[(ProductId, i64)]) -> String {
        let entries = entries
            .iter()
            .map(|&(id, amount)| CartEntry {
                product: product(id),
                amount,
            })
            .collect();
        Cart::from_entries(entries).unwrap().to_blob().unwrap()
    }

    fn amounts(cart: &Cart) -> Vec<(ProductId, i64)> {
        cart.entries().iter().map(|e| (e.id(), e.amount)).collect()
    }

    struct Fixture {
        store: CartStore,
        catalog: Arc<FakeCatalog>,
        storage: Arc<MemoryStorage>,
        notices: broadcast::Receiver<CartNotice>,
    }

    impl Fixture {
        async fn new(catalog: FakeCatalog, persisted: &[(ProductId, i64)]) -> Self {
            let catalog = Arc::new(catalog);
            let storage = Arc::new(if persisted.is_empty() {
                MemoryStorage::new()
            } else {
                MemoryStorage::with_entry(KEY, blob(persisted))
            });
            let notifier = Arc::new(ChannelNotifier::default());
            let notices = notifier.subscribe();

            let store = CartStore::initialize(
                catalog.clone(),
                storage.clone(),
                CartStoreOptions::default().notifier(notifier),
            )
            .await;

            Fixture {
                store,
                catalog,
                storage,
                notices,
            }
        }

        async fn persisted(&self) -> Option<Vec<(ProductId, i64)>> {
            let blob = self.storage.get(KEY).await?;
            Some(amounts(&Cart::from_blob(&blob).unwrap()))
        }
    }

    // -------------------------------------------------------------------------
    // Initialize
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_initialize_restores_persisted_cart() {
        let fx = Fixture::new(FakeCatalog::default(), &[(3, 2), (1, 1)]).await;

        assert_eq!(amounts(fx.store.cart()), vec![(3, 2), (1, 1)]);
    }

    #[tokio::test]
    async fn test_initialize_with_nothing_persisted() {
        let fx = Fixture::new(FakeCatalog::default(), &[]).await;

        assert!(fx.store.cart().is_empty());
    }

    #[tokio::test]
    async fn test_initialize_discards_malformed_blob() {
        let store = CartStore::initialize(
            Arc::new(FakeCatalog::default()),
            Arc::new(MemoryStorage::with_entry(KEY, "{broken")),
            CartStoreOptions::default(),
        )
        .await;

        assert!(store.cart().is_empty());
    }

    #[tokio::test]
    async fn test_initialize_survives_read_failure() {
        let store = CartStore::initialize(
            Arc::new(FakeCatalog::default()),
            Arc::new(UnreadableStorage),
            CartStoreOptions::default(),
        )
        .await;

        assert!(store.cart().is_empty());
    }

    #[tokio::test]
    async fn test_custom_storage_key() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = CartStore::initialize(
            Arc::new(FakeCatalog::with_stock(&[(1, 5)])),
            storage.clone(),
            CartStoreOptions::default().storage_key("custom"),
        )
        .await;

        store.add_product(1).await;

        assert!(storage.get("custom").await.is_some());
        assert!(storage.get(KEY).await.is_none());
    }

    // -------------------------------------------------------------------------
    // Add
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_add_new_product_to_empty_cart() {
        let mut fx = Fixture::new(FakeCatalog::with_stock(&[(1, 5)]), &[]).await;

        let outcome = fx.store.add_product(1).await;

        assert_eq!(outcome, CartOutcome::Committed);
        assert_eq!(amounts(fx.store.cart()), vec![(1, 1)]);
        assert_eq!(fx.persisted().await, Some(vec![(1, 1)]));
        assert_eq!(fx.store.cart().get(1).unwrap().product, product(1));
    }

    #[tokio::test]
    async fn test_add_existing_product_increments() {
        let mut fx = Fixture::new(FakeCatalog::with_stock(&[(1, 5), (2, 5)]), &[(1, 1), (2, 1)]).await;

        assert!(fx.store.add_product(1).await.is_committed());

        assert_eq!(amounts(fx.store.cart()), vec![(1, 2), (2, 1)]);
        assert_eq!(fx.persisted().await, Some(vec![(1, 2), (2, 1)]));
    }

    #[tokio::test]
    async fn test_add_beyond_stock_is_rejected() {
        let mut fx = Fixture::new(FakeCatalog::with_stock(&[(1, 1)]), &[(1, 1)]).await;

        let outcome = fx.store.add_product(1).await;

        assert_eq!(outcome, CartOutcome::Rejected(CartNotice::OutOfStock));
        assert_eq!(fx.notices.try_recv().unwrap(), CartNotice::OutOfStock);
        assert_eq!(amounts(fx.store.cart()), vec![(1, 1)]);
        assert_eq!(fx.persisted().await, Some(vec![(1, 1)]));
    }

    #[tokio::test]
    async fn test_add_can_reach_stock_ceiling() {
        let mut fx = Fixture::new(FakeCatalog::with_stock(&[(1, 3)]), &[(1, 2)]).await;

        assert!(fx.store.add_product(1).await.is_committed());
        assert_eq!(fx.store.cart().amount_of(1), 3);
    }

    #[tokio::test]
    async fn test_add_on_max_amount_keeps_store_running() {
        let fx = Fixture::new(FakeCatalog::with_stock(&[(1, i64::MAX)]), &[(1, i64::MAX)]).await;
        let handle = fx.store.start();

        let outcome = handle.add_product(1).await.unwrap();

        assert_eq!(outcome, CartOutcome::Rejected(CartNotice::OutOfStock));
        assert_eq!(handle.cart().amount_of(1), i64::MAX);
        assert_eq!(handle.remove_product(1).await.unwrap(), CartOutcome::Committed);
        assert!(handle.cart().is_empty());
    }

    #[tokio::test]
    async fn test_add_lookup_failure_leaves_no_trace() {
        let catalog = FakeCatalog::with_stock(&[(1, 5)]);
        catalog.failing.store(true, Ordering::SeqCst);
        let mut fx = Fixture::new(catalog, &[]).await;

        let outcome = fx.store.add_product(1).await;

        assert_eq!(outcome.notice(), Some(CartNotice::AddFailed));
        assert_eq!(fx.notices.try_recv().unwrap(), CartNotice::AddFailed);
        assert!(fx.store.cart().is_empty());
        assert_eq!(fx.persisted().await, None);

        fx.catalog.failing.store(false, Ordering::SeqCst);
        assert!(fx.store.add_product(1).await.is_committed());
    }

    #[tokio::test]
    async fn test_add_unknown_product() {
        let mut fx = Fixture::new(FakeCatalog::default(), &[]).await;

        assert_eq!(
            fx.store.add_product(42).await,
            CartOutcome::Rejected(CartNotice::AddFailed)
        );
        assert_eq!(
            fx.store.add_product(0).await,
            CartOutcome::Rejected(CartNotice::AddFailed)
        );
    }

    #[tokio::test]
    async fn test_add_storage_failure_aborts() {
        let notifier = Arc::new(ChannelNotifier::default());
        let mut notices = notifier.subscribe();
        let mut store = CartStore::initialize(
            Arc::new(FakeCatalog::with_stock(&[(1, 5)])),
            Arc::new(ReadOnlyStorage(MemoryStorage::new())),
            CartStoreOptions::default().notifier(notifier),
        )
        .await;
        let carts = store.subscribe();

        let outcome = store.add_product(1).await;

        assert_eq!(outcome, CartOutcome::Rejected(CartNotice::AddFailed));
        assert_eq!(notices.try_recv().unwrap(), CartNotice::AddFailed);
        assert!(store.cart().is_empty());
        assert!(!carts.has_changed().unwrap());
    }

    // -------------------------------------------------------------------------
    // Remove
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_remove_product() {
        let mut fx = Fixture::new(FakeCatalog::default(), &[(2, 1)]).await;

        assert!(fx.store.remove_product(2).await.is_committed());

        assert!(fx.store.cart().is_empty());
        assert_eq!(fx.persisted().await, Some(vec![]));
    }

    #[tokio::test]
    async fn test_remove_keeps_order_of_others() {
        let mut fx = Fixture::new(FakeCatalog::default(), &[(1, 1), (2, 3), (3, 2)]).await;

        fx.store.remove_product(2).await;

        assert_eq!(amounts(fx.store.cart()), vec![(1, 1), (3, 2)]);
    }

    #[tokio::test]
    async fn test_remove_missing_product_leaves_blob_untouched() {
        let mut fx = Fixture::new(FakeCatalog::default(), &[(1, 2)]).await;
        let before = fx.storage.get(KEY).await;

        let outcome = fx.store.remove_product(9).await;

        assert_eq!(outcome, CartOutcome::Rejected(CartNotice::RemoveFailed));
        assert_eq!(fx.notices.try_recv().unwrap(), CartNotice::RemoveFailed);
        assert_eq!(fx.storage.get(KEY).await, before);
        assert_eq!(amounts(fx.store.cart()), vec![(1, 2)]);
    }

    // -------------------------------------------------------------------------
    // Update
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_update_non_positive_amount_is_ignored() {
        let mut fx = Fixture::new(FakeCatalog::with_stock(&[(1, 5)]), &[(1, 2)]).await;

        assert_eq!(
            fx.store.update_product_amount(AmountUpdate::new(1, 0)).await,
            CartOutcome::Ignored
        );
        assert_eq!(
            fx.store.update_product_amount(AmountUpdate::new(1, -3)).await,
            CartOutcome::Ignored
        );

        assert!(fx.notices.try_recv().is_err());
        assert_eq!(amounts(fx.store.cart()), vec![(1, 2)]);
    }

    #[tokio::test]
    async fn test_update_at_stock_is_rejected() {
        let mut fx = Fixture::new(FakeCatalog::with_stock(&[(3, 10)]), &[(3, 1)]).await;

        assert!(fx
            .store
            .update_product_amount(AmountUpdate::new(3, 9))
            .await
            .is_committed());
        assert_eq!(fx.store.cart().amount_of(3), 9);

        let outcome = fx.store.update_product_amount(AmountUpdate::new(3, 10)).await;

        assert_eq!(outcome, CartOutcome::Rejected(CartNotice::OutOfStock));
        assert_eq!(fx.notices.try_recv().unwrap(), CartNotice::OutOfStock);
        assert_eq!(fx.store.cart().amount_of(3), 9);
        assert_eq!(fx.persisted().await, Some(vec![(3, 9)]));
    }

    #[tokio::test]
    async fn test_totals_after_huge_update() {
        let mut fx = Fixture::new(FakeCatalog::with_stock(&[(1, i64::MAX)]), &[(1, 1)]).await;

        let outcome = fx
            .store
            .update_product_amount(AmountUpdate::new(1, i64::MAX / 1000))
            .await;

        assert!(outcome.is_committed());
        let totals = fx.store.cart().totals();
        assert_eq!(totals.total_quantity, i64::MAX / 1000);
        assert_eq!(totals.subtotal_cents, i64::MAX);
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let mut fx = Fixture::new(FakeCatalog::with_stock(&[(4, 10)]), &[(1, 1)]).await;

        let outcome = fx.store.update_product_amount(AmountUpdate::new(4, 2)).await;

        assert_eq!(outcome, CartOutcome::Rejected(CartNotice::UpdateFailed));
        assert_eq!(amounts(fx.store.cart()), vec![(1, 1)]);
    }

    #[tokio::test]
    async fn test_update_lookup_failure() {
        let catalog = FakeCatalog::with_stock(&[(1, 10)]);
        catalog.failing.store(true, Ordering::SeqCst);
        let mut fx = Fixture::new(catalog, &[(1, 1)]).await;

        let outcome = fx.store.update_product_amount(AmountUpdate::new(1, 2)).await;

        assert_eq!(outcome, CartOutcome::Rejected(CartNotice::UpdateFailed));
        assert_eq!(fx.persisted().await, Some(vec![(1, 1)]));
    }

    // -------------------------------------------------------------------------
    // Persistence & publishing
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_reinitialize_from_written_blob() {
        let mut fx = Fixture::new(FakeCatalog::with_stock(&[(1, 5), (2, 5), (3, 5)]), &[]).await;
        for id in [3, 1, 2, 1] {
            fx.store.add_product(id).await;
        }

        let restored = CartStore::initialize(
            fx.catalog.clone(),
            fx.storage.clone(),
            CartStoreOptions::default(),
        )
        .await;

        assert_eq!(restored.cart(), fx.store.cart());
        assert_eq!(amounts(restored.cart()), vec![(3, 1), (1, 2), (2, 1)]);
    }

    #[tokio::test]
    async fn test_commits_are_published() {
        let mut fx = Fixture::new(FakeCatalog::with_stock(&[(1, 5)]), &[]).await;
        let mut carts = fx.store.subscribe();

        fx.store.add_product(1).await;

        assert!(carts.has_changed().unwrap());
        assert_eq!(amounts(&carts.borrow_and_update()), vec![(1, 1)]);

        fx.store.remove_product(7).await;
        assert!(!carts.has_changed().unwrap());
    }

    // -------------------------------------------------------------------------
    // Handle
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_concurrent_adds_do_not_lose_updates() {
        let catalog = FakeCatalog::with_stock(&[(1, 5)]).slow(Duration::from_millis(50));
        let fx = Fixture::new(catalog, &[]).await;
        let storage = fx.storage.clone();
        let handle = fx.store.start();

        let (first, second) = tokio::join!(handle.add_product(1), handle.add_product(1));

        assert_eq!(first.unwrap(), CartOutcome::Committed);
        assert_eq!(second.unwrap(), CartOutcome::Committed);
        assert_eq!(handle.cart().amount_of(1), 2);

        let persisted = Cart::from_blob(&storage.get(KEY).await.unwrap()).unwrap();
        assert_eq!(persisted.amount_of(1), 2);
    }

    #[tokio::test]
    async fn test_handle_runs_all_operations() {
        let fx = Fixture::new(FakeCatalog::with_stock(&[(1, 5), (2, 5)]), &[]).await;
        let handle = fx.store.start();
        let mut carts = handle.subscribe();

        handle.add_product(1).await.unwrap();
        handle.add_product(2).await.unwrap();
        handle
            .update_product_amount(AmountUpdate::new(1, 4))
            .await
            .unwrap();
        let outcome = handle.remove_product(2).await.unwrap();

        assert!(outcome.is_committed());
        assert!(carts.has_changed().unwrap());
        assert_eq!(amounts(&carts.borrow_and_update()), vec![(1, 4)]);
        assert_eq!(amounts(&handle.cart()), vec![(1, 4)]);
    }

    #[tokio::test]
    async fn test_handle_after_shutdown() {
        let fx = Fixture::new(FakeCatalog::with_stock(&[(1, 5)]), &[]).await;
        let handle = fx.store.start();

        handle.shutdown().await.unwrap();

        // Queued behind the shutdown, so it is dropped unanswered
        let result = handle.add_product(1).await;

        assert!(matches!(
            result,
            Err(StoreError::ChannelError(_)) | Err(StoreError::ShuttingDown)
        ));
    }
}
