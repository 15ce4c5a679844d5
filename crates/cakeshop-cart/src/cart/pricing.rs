//! Cart totals for checkout display.

use crate::cart::Cart;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Flat shipping fee charged at checkout.
pub const DEFAULT_SHIPPING_FEE: Money = Money::from_major(60);

/// How shipping is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShippingPolicy {
    /// Fixed fee per order.
    Flat(Money),
    /// No shipping charge.
    Free,
}

impl ShippingPolicy {
    /// Shipping fee for an order.
    pub fn fee(&self) -> Money {
        match self {
            Self::Flat(fee) => *fee,
            Self::Free => Money::ZERO,
        }
    }
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self::Flat(DEFAULT_SHIPPING_FEE)
    }
}

/// Pricing breakdown for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    /// Sum of quantities.
    pub item_count: u64,
    /// Sum of line totals.
    pub subtotal: Money,
    /// Shipping fee.
    pub shipping: Money,
    /// Subtotal plus shipping.
    pub total: Money,
}

impl CartTotals {
    /// Compute totals for `cart` under `shipping`.
    pub fn compute(cart: &Cart, shipping: &ShippingPolicy) -> Self {
        let subtotal = cart.subtotal();
        let shipping = shipping.fee();
        Self {
            item_count: cart.item_count(),
            subtotal,
            shipping,
            total: subtotal + shipping,
        }
    }
}
