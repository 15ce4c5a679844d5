//! Shopping cart module.
//!
//! Contains the cart state, its persisted store, pricing and subscriptions.

mod cart;
mod pricing;
mod seed;
mod store;
mod subscription;

pub use cart::{AddOutcome, Cart, LineItem, DEFAULT_VARIANT, MAX_QUANTITY_PER_ITEM};
pub use pricing::{CartTotals, ShippingPolicy, DEFAULT_SHIPPING_FEE};
pub use seed::{demo_items, CartSeed};
pub use store::{CartOptions, CartStore, DEFAULT_CART_KEY};
pub use subscription::{CartChange, CartEvent, HydrationSource, SubscriptionId};
