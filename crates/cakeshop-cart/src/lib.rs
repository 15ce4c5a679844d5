//! Shopping cart state for Cakeshop.
//!
//! This crate owns the session cart:
//!
//! - **Cart**: an ordered list of line items, unique by product and variant
//! - **CartStore**: the cart plus its persisted slot and change subscribers
//! - **Pricing**: subtotal, flat shipping and order total
//!
//! # Example
//!
//! ```rust
//! use cakeshop_cache::Cache;
//! use cakeshop_cart::prelude::*;
//!
//! let mut store = CartStore::open(Cache::in_memory(), CartOptions::default());
//!
//! store.subscribe(|change| {
//!     println!("cart now holds {} item(s)", change.count);
//! });
//!
//! let nozzles = LineItem::new(ProductId::new(1), "Piping nozzles", Money::from_major(160))
//!     .with_variant("Standard Set");
//! store.add_item(nozzles.clone()).unwrap();
//! store.add_item(nozzles.with_quantity(2)).unwrap();
//!
//! assert_eq!(store.cart_count(), 3);
//! let totals = store.totals(&ShippingPolicy::default());
//! assert_eq!(Currency::BDT.format(totals.total), "\u{09f3}540.00");
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;

pub use cart::{
    demo_items, AddOutcome, Cart, CartChange, CartEvent, CartOptions, CartSeed, CartStore,
    CartTotals, HydrationSource, LineItem, ShippingPolicy, SubscriptionId, DEFAULT_CART_KEY,
    DEFAULT_SHIPPING_FEE, DEFAULT_VARIANT, MAX_QUANTITY_PER_ITEM,
};
pub use error::CartError;
pub use ids::{LineKey, ProductId};
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::cart::{
        Cart, CartChange, CartEvent, CartOptions, CartSeed, CartStore, CartTotals,
        HydrationSource, LineItem, ShippingPolicy,
    };
    pub use crate::error::CartError;
    pub use crate::ids::{LineKey, ProductId};
    pub use crate::money::{Currency, Money};
}
