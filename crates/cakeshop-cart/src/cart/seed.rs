//! Initial cart contents used when nothing valid is persisted.

use crate::cart::{Cart, LineItem};
use crate::error::CartError;
use crate::ids::ProductId;
use crate::money::Money;

/// Where a fresh cart's entries come from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CartSeed {
    /// Start empty.
    #[default]
    Empty,
    /// Start with the storefront's two demo entries.
    Demo,
    /// Start with caller-provided entries.
    Custom(Cart),
}

impl CartSeed {
    /// Seed with caller-provided entries, validating them first.
    pub fn items(items: Vec<LineItem>) -> Result<Self, CartError> {
        Cart::from_items(items).map(Self::Custom)
    }

    /// Build the cart this seed describes.
    pub fn to_cart(&self) -> Cart {
        match self {
            Self::Empty => Cart::new(),
            Self::Demo => demo_cart(),
            Self::Custom(cart) => cart.clone(),
        }
    }
}

/// The demo entries shown on a first visit.
pub fn demo_items() -> Vec<LineItem> {
    vec![
        LineItem::new(
            ProductId::new(1),
            "Piping nozzles for cake decoration",
            Money::from_major(160),
        )
        .with_image("/images/product1.jpg")
        .with_variant("Standard Set"),
        LineItem::new(
            ProductId::new(2),
            "Professional kitchen knife set",
            Money::from_major(3150),
        )
        .with_image("/images/product2.jpg")
        .with_quantity(2)
        .with_variant("Professional"),
    ]
}

fn demo_cart() -> Cart {
    Cart::from_items(demo_items()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_seed_is_empty() {
        assert!(CartSeed::default().to_cart().is_empty());
    }

    #[test]
    fn test_demo_seed_contents() {
        let cart = CartSeed::Demo.to_cart();
        assert_eq!(cart.unique_item_count(), 2);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.items(), demo_items().as_slice());
    }

    #[test]
    fn test_custom_seed_validated() {
        let dup = vec![demo_items()[0].clone(), demo_items()[0].clone()];
        assert!(CartSeed::items(dup).is_err());
        assert!(CartSeed::items(demo_items()).is_ok());
    }
}
