//! Persisted cart store.

use cakeshop_cache::{Cache, CacheError};
use tracing::{debug, info, warn};

use crate::cart::subscription::Subscribers;
use crate::cart::{
    AddOutcome, Cart, CartChange, CartEvent, CartSeed, CartTotals, HydrationSource, LineItem,
    ShippingPolicy, SubscriptionId,
};
use crate::error::CartError;
use crate::ids::ProductId;
use crate::money::Money;

/// Slot key the cart is persisted under unless configured otherwise.
pub const DEFAULT_CART_KEY: &str = "cart";

/// Options for opening a [`CartStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartOptions {
    /// Slot key for the persisted entry list.
    pub key: String,
    /// Contents to start from when nothing valid is persisted.
    pub seed: CartSeed,
}

impl CartOptions {
    /// Set the slot key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Set the seed.
    pub fn with_seed(mut self, seed: CartSeed) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for CartOptions {
    fn default() -> Self {
        Self {
            key: DEFAULT_CART_KEY.to_string(),
            seed: CartSeed::Empty,
        }
    }
}

/// The authoritative cart for one session.
///
/// Every mutation keeps three things in step: the in-memory entry list, the
/// persisted slot (the full list when non-empty, no slot at all when empty)
/// and the subscribers, who are told about the change after it is written.
/// Derived values (`cart_count`, `subtotal`) are computed on each read.
///
/// The store never panics on bad persisted data and never fails a mutation
/// because the slot could not be written: write failures are logged and the
/// in-memory state stays authoritative. Use [`flush`](Self::flush) to surface
/// storage errors explicitly.
///
/// # Example
///
/// ```rust
/// use cakeshop_cache::Cache;
/// use cakeshop_cart::{CartOptions, CartStore, LineItem, Money, ProductId};
///
/// let mut store = CartStore::open(Cache::in_memory(), CartOptions::default());
/// store
///     .add_item(LineItem::new(ProductId::new(1), "Piping nozzles", Money::from_major(160)))
///     .unwrap();
/// assert_eq!(store.cart_count(), 1);
/// ```
#[derive(Debug)]
pub struct CartStore {
    cart: Cart,
    cache: Cache,
    key: String,
    hydration: HydrationSource,
    subscribers: Subscribers,
}

impl CartStore {
    /// Open the store, hydrating from the slot or falling back to the seed.
    ///
    /// The adopted state is written straight back to the slot so that a
    /// corrupt payload is replaced and a seeded cart becomes durable. A slot
    /// that could not be read at all is not written until the first mutation.
    pub fn open(cache: Cache, options: CartOptions) -> Self {
        let (cart, hydration) = hydrate(&cache, &options.key, &options.seed);
        let store = Self {
            cart,
            cache,
            key: options.key,
            hydration,
            subscribers: Subscribers::default(),
        };
        if hydration.writes_back() {
            store.persist_or_warn();
        }
        store
    }

    /// How the initial state was obtained.
    pub fn hydration(&self) -> HydrationSource {
        self.hydration
    }

    /// Slot key the cart is persisted under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The current cart state.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Entries in insertion order.
    pub fn items(&self) -> &[LineItem] {
        self.cart.items()
    }

    /// Sum of quantities across all entries.
    pub fn cart_count(&self) -> u64 {
        self.cart.item_count()
    }

    /// Sum of `price * quantity` across all entries.
    pub fn subtotal(&self) -> Money {
        self.cart.subtotal()
    }

    /// Totals including shipping.
    pub fn totals(&self, shipping: &ShippingPolicy) -> CartTotals {
        CartTotals::compute(&self.cart, shipping)
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Get an entry by key.
    pub fn get(&self, id: ProductId, variant: &str) -> Option<&LineItem> {
        self.cart.get(id, variant)
    }

    /// Add an item, merging quantities with an entry of the same key.
    ///
    /// Invalid items are rejected and leave the cart untouched.
    pub fn add_item(&mut self, item: LineItem) -> Result<(), CartError> {
        let key = item.key();
        let outcome = self.cart.add_item(item)?;
        match outcome {
            AddOutcome::Appended => debug!(key = %key, "cart item appended"),
            AddOutcome::Merged(quantity) => debug!(key = %key, quantity, "cart item merged"),
        }
        self.commit(CartEvent::ItemAdded {
            key,
            merged: outcome.is_merged(),
        });
        Ok(())
    }

    /// Remove every entry for a product, whatever its variant.
    ///
    /// This matches entries by product id alone, unlike `add_item` which
    /// merges by `(id, variant)`. Use [`remove_variant`](Self::remove_variant)
    /// to remove a single entry. Returns the number of entries removed.
    pub fn remove_item(&mut self, id: ProductId) -> usize {
        let removed = self.cart.remove_item(id);
        if removed > 0 {
            debug!(%id, removed, "cart items removed");
            self.commit(CartEvent::ItemsRemoved { id, removed });
        }
        removed
    }

    /// Remove the single entry keyed by `(id, variant)`.
    pub fn remove_variant(&mut self, id: ProductId, variant: &str) -> bool {
        let removed = self.cart.remove_variant(id, variant);
        if removed {
            debug!(%id, variant, "cart variant removed");
            self.commit(CartEvent::ItemsRemoved { id, removed: 1 });
        }
        removed
    }

    /// Set the quantity of every entry for a product, whatever its variant.
    ///
    /// Quantities below one are ignored. Returns the number of entries updated.
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) -> Result<usize, CartError> {
        let updated = self.cart.update_quantity(id, quantity)?;
        if updated > 0 {
            let quantity = self.quantity_of(id);
            debug!(%id, quantity, updated, "cart quantity updated");
            self.commit(CartEvent::QuantityUpdated {
                id,
                quantity,
                updated,
            });
        }
        Ok(updated)
    }

    /// Set the quantity of the single entry keyed by `(id, variant)`.
    ///
    /// Quantities below one are ignored.
    pub fn update_variant_quantity(
        &mut self,
        id: ProductId,
        variant: &str,
        quantity: i64,
    ) -> Result<bool, CartError> {
        let updated = self.cart.update_variant_quantity(id, variant, quantity)?;
        if updated {
            let quantity = self
                .cart
                .get(id, variant)
                .map(|i| i.quantity)
                .unwrap_or_default();
            debug!(%id, variant, quantity, "cart variant quantity updated");
            self.commit(CartEvent::QuantityUpdated {
                id,
                quantity,
                updated: 1,
            });
        }
        Ok(updated)
    }

    /// Empty the cart and erase the persisted slot.
    ///
    /// Does nothing, and publishes nothing, when the cart is already empty.
    pub fn clear(&mut self) {
        if self.cart.is_empty() {
            return;
        }
        self.cart.clear();
        debug!("cart cleared");
        self.commit(CartEvent::Cleared);
    }

    /// Write the current state to the slot, reporting any storage error.
    pub fn flush(&self) -> Result<(), CartError> {
        self.persist().map_err(CartError::from)
    }

    /// Register a listener for state changes.
    ///
    /// The listener is called once right away with [`CartEvent::Hydrated`]
    /// and the current entries, then after every change.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&CartChange<'_>) + Send + 'static,
    {
        let id = self.subscribers.add(Box::new(listener));
        let event = CartEvent::Hydrated(self.hydration);
        self.subscribers.notify_last(&CartChange {
            event: &event,
            items: self.cart.items(),
            count: self.cart.item_count(),
        });
        id
    }

    /// Detach a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    /// Number of registered listeners.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn quantity_of(&self, id: ProductId) -> u32 {
        self.cart
            .entries_for(id)
            .next()
            .map(|i| i.quantity)
            .unwrap_or_default()
    }

    fn commit(&mut self, event: CartEvent) {
        self.persist_or_warn();
        self.subscribers.notify(&CartChange {
            event: &event,
            items: self.cart.items(),
            count: self.cart.item_count(),
        });
    }

    fn persist(&self) -> Result<(), CacheError> {
        if self.cart.is_empty() {
            self.cache.delete(&self.key)
        } else {
            self.cache.set(&self.key, &self.cart)
        }
    }

    fn persist_or_warn(&self) {
        if let Err(e) = self.persist() {
            warn!(key = %self.key, error = %e, "failed to persist cart");
        }
    }
}

fn hydrate(cache: &Cache, key: &str, seed: &CartSeed) -> (Cart, HydrationSource) {
    match cache.get::<Cart>(key) {
        Ok(Some(cart)) => {
            info!(key, entries = cart.unique_item_count(), "cart loaded from storage");
            (cart, HydrationSource::Persisted)
        }
        Ok(None) => {
            info!(key, "no persisted cart; using seed");
            (seed.to_cart(), HydrationSource::Seeded)
        }
        Err(e) if e.is_corrupt() => {
            warn!(key, error = %e, "persisted cart is corrupt; using seed");
            (seed.to_cart(), HydrationSource::Recovered)
        }
        Err(e) => {
            warn!(key, error = %e, "persisted cart unreadable; using seed, slot left as is");
            (seed.to_cart(), HydrationSource::Unavailable)
        }
    }
}
