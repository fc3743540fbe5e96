use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use super::notifier::{user_message, Notifier, Operation};
use crate::models::{
    Cart, CartError, CartItem, CartResult, CartSummary, Product, ProductId, StockRecord,
    StorageError, StorageResult,
};
use crate::observability::Metrics;
use crate::repositories::{PersistedStore, ProductCatalog, StockService};

/// Key under which the serialised cart is persisted
pub const CART_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Shopping cart state with stock-checked mutations
///
/// The cart is rehydrated from the persisted store when the store is opened
/// and every successful mutation overwrites the persisted blob before it
/// becomes visible to readers. Failed operations leave the cart untouched,
/// emit exactly one user notification and return the error to the caller.
///
/// Lookups are not guarded by any lock: two operations on the same product
/// may interleave between their lookups and their commits, and the later
/// commit wins.
pub struct CartStore {
    catalog: Arc<dyn ProductCatalog>,
    stock: Arc<dyn StockService>,
    storage: Arc<dyn PersistedStore>,
    notifier: Arc<dyn Notifier>,
    metrics: Option<Arc<Metrics>>,
    state: watch::Sender<Cart>,
    commit_lock: Mutex<()>,
}

impl CartStore {
    /// Open the store, restoring the cart from `storage` when a blob exists
    pub fn open(
        catalog: Arc<dyn ProductCatalog>,
        stock: Arc<dyn StockService>,
        storage: Arc<dyn PersistedStore>,
        notifier: Arc<dyn Notifier>,
    ) -> StorageResult<Self> {
        let cart = load_cart(storage.as_ref())?;
        info!(items = cart.len(), "Cart store opened");

        let (state, _) = watch::channel(cart);

        Ok(Self {
            catalog,
            stock,
            storage,
            notifier,
            metrics: None,
            state,
            commit_lock: Mutex::new(()),
        })
    }

    /// Record operation outcomes and lookups in `metrics`
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        metrics.set_cart_items(self.state.borrow().len());
        self.metrics = Some(metrics);
        self
    }

    /// Snapshot of the current cart
    pub fn cart(&self) -> Cart {
        self.state.borrow().clone()
    }

    /// Receiver that observes every committed cart
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.state.subscribe()
    }

    pub fn item(&self, product_id: ProductId) -> Option<CartItem> {
        self.state.borrow().get_item(product_id).cloned()
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.state.borrow().contains_item(product_id)
    }

    pub fn summary(&self) -> CartSummary {
        self.state.borrow().summary()
    }

    /// Add one unit of a product
    ///
    /// A product already in the cart goes through
    /// [`update_product_amount`](Self::update_product_amount) with its amount
    /// plus one. A new product is appended with amount 1 when the stock
    /// service reports at least one unit.
    #[instrument(skip(self))]
    pub async fn add_product(&self, product_id: ProductId) -> CartResult<()> {
        if let Some(amount) = self.item_amount(product_id) {
            debug!(amount, "Product already in cart, incrementing amount");
            let result = self
                .update_product_amount(product_id, amount.saturating_add(1))
                .await;
            self.record_operation(Operation::AddProduct, &result);
            return result;
        }

        info!("Adding product to cart");
        let result = self.append_product(product_id).await;
        self.finish(Operation::AddProduct, result)
    }

    /// Remove a product from the cart
    #[instrument(skip(self))]
    pub fn remove_product(&self, product_id: ProductId) -> CartResult<()> {
        info!("Removing product from cart");

        let result = self.commit(|cart| {
            if cart.remove_item(product_id) {
                Ok(())
            } else {
                Err(CartError::NotFound { product_id })
            }
        });
        self.finish(Operation::RemoveProduct, result)
    }

    /// Set the amount of a product already in the cart
    ///
    /// The amount must be at least 1 and covered by the current stock.
    #[instrument(skip(self))]
    pub async fn update_product_amount(&self, product_id: ProductId, amount: u32) -> CartResult<()> {
        info!("Updating product amount");

        let result = self.change_amount(product_id, amount).await;
        self.finish(Operation::UpdateProductAmount, result)
    }

    async fn append_product(&self, product_id: ProductId) -> CartResult<()> {
        // Both lookups run to completion even when one of them fails
        let (product, stock) = tokio::join!(
            self.fetch_product(product_id),
            self.fetch_stock(product_id)
        );
        let (product, stock) = (product?, stock?);

        if !stock.is_available() {
            return Err(CartError::OutOfStock {
                product_id,
                requested: 1,
                available: stock.amount,
            });
        }

        self.commit(|cart| {
            if !cart.push_item(product, 1) {
                // A concurrent add committed first; last write wins
                cart.set_amount(product_id, 1);
            }
            Ok(())
        })
    }

    async fn change_amount(&self, product_id: ProductId, amount: u32) -> CartResult<()> {
        if amount == 0 || !self.contains(product_id) {
            return Err(CartError::InvalidRequest { product_id, amount });
        }

        let stock = self.fetch_stock(product_id).await?;
        if !stock.covers(amount) {
            return Err(CartError::OutOfStock {
                product_id,
                requested: amount,
                available: stock.amount,
            });
        }

        self.commit(|cart| {
            if cart.set_amount(product_id, amount) {
                Ok(())
            } else {
                // Removed while the stock lookup was in flight
                Err(CartError::InvalidRequest { product_id, amount })
            }
        })
    }

    fn item_amount(&self, product_id: ProductId) -> Option<u32> {
        self.state
            .borrow()
            .get_item(product_id)
            .map(|item| item.amount)
    }

    async fn fetch_product(&self, product_id: ProductId) -> CartResult<Product> {
        let started = Instant::now();
        let result = self.catalog.get_product(product_id).await;
        self.record_lookup("catalog", result.is_ok(), started);
        result.map_err(|e| CartError::lookup(product_id, e))
    }

    async fn fetch_stock(&self, product_id: ProductId) -> CartResult<StockRecord> {
        let started = Instant::now();
        let result = self.stock.get_stock(product_id).await;
        self.record_lookup("stock", result.is_ok(), started);
        result.map_err(|e| CartError::lookup(product_id, e))
    }

    /// Apply `mutate` to a copy of the cart, persist it, then publish it
    fn commit<F>(&self, mutate: F) -> CartResult<()>
    where
        F: FnOnce(&mut Cart) -> CartResult<()>,
    {
        let _guard = self.commit_lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut next = self.state.borrow().clone();
        mutate(&mut next)?;
        self.persist(&next)?;

        let items = next.len();
        self.state.send_replace(next);
        if let Some(metrics) = &self.metrics {
            metrics.set_cart_items(items);
        }

        debug!(items, "Cart committed");
        Ok(())
    }

    fn persist(&self, cart: &Cart) -> CartResult<()> {
        let blob = serde_json::to_string(cart).map_err(StorageError::from)?;
        self.storage.write(CART_STORAGE_KEY, &blob)?;
        Ok(())
    }

    fn finish(&self, operation: Operation, result: CartResult<()>) -> CartResult<()> {
        self.record_operation(operation, &result);
        match &result {
            Ok(()) => info!(%operation, "Cart operation succeeded"),
            Err(error) => {
                warn!(%operation, kind = error.kind(), error = %error, "Cart operation failed");
                if let Some(metrics) = &self.metrics {
                    metrics.record_notification(operation.as_str(), error.kind());
                }
                self.notifier.notify(user_message(operation, error));
            }
        }
        result
    }

    fn record_operation(&self, operation: Operation, result: &CartResult<()>) {
        if let Some(metrics) = &self.metrics {
            let status = match result {
                Ok(()) => "success",
                Err(error) => error.kind(),
            };
            metrics.record_cart_operation(operation.as_str(), status);
        }
    }

    fn record_lookup(&self, service: &str, success: bool, started: Instant) {
        if let Some(metrics) = &self.metrics {
            metrics.record_lookup(service, success, started.elapsed().as_secs_f64());
        }
    }
}

fn load_cart(storage: &dyn PersistedStore) -> StorageResult<Cart> {
    let Some(blob) = storage.read(CART_STORAGE_KEY)? else {
        return Ok(Cart::new());
    };

    match serde_json::from_str::<Vec<CartItem>>(&blob) {
        Ok(items) => Ok(Cart::from_items(items)),
        Err(e) => {
            warn!(error = %e, "Ignoring unreadable persisted cart");
            Ok(Cart::new())
        }
    }
}
