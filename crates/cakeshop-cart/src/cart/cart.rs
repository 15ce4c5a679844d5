//! Cart and line item types.

use crate::error::CartError;
use crate::ids::{LineKey, ProductId};
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: u32 = 9999;

/// Variant used when a product is added without choosing one.
pub const DEFAULT_VARIANT: &str = "Standard";

/// An ordered collection of line items, unique by `(id, variant)`.
///
/// This is the pure state behind [`CartStore`](crate::CartStore): it knows how
/// to merge, remove and re-quantify entries but nothing about persistence or
/// subscribers. Serialized as a bare JSON array of line items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

/// What `Cart::add_item` did with the incoming item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new entry was appended.
    Appended,
    /// An existing entry's quantity grew to the given value.
    Merged(u32),
}

impl AddOutcome {
    /// Whether the item was folded into an existing entry.
    pub fn is_merged(&self) -> bool {
        matches!(self, Self::Merged(_))
    }
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from an existing entry list, checking every invariant.
    ///
    /// Fails if an entry is invalid or two entries share a key.
    pub fn from_items(items: Vec<LineItem>) -> Result<Self, CartError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            item.validate()?;
            if !seen.insert(item.key()) {
                return Err(CartError::DuplicateEntry(item.key()));
            }
        }
        Ok(Self { items })
    }

    /// Add an item to the cart.
    ///
    /// If an entry with the same `(id, variant)` exists, only its quantity
    /// grows; the stored name, price and image are kept. Otherwise the item is
    /// appended.
    ///
    /// Returns an error if:
    /// - Quantity is below one or the price is negative
    /// - The resulting quantity would exceed MAX_QUANTITY_PER_ITEM
    pub fn add_item(&mut self, item: LineItem) -> Result<AddOutcome, CartError> {
        item.validate()?;

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.is_keyed(item.id, &item.variant))
        {
            let new_quantity = u64::from(existing.quantity) + u64::from(item.quantity);
            let new_quantity = checked_quantity(new_quantity)?;
            existing.quantity = new_quantity;
            return Ok(AddOutcome::Merged(new_quantity));
        }

        self.items.push(item);
        Ok(AddOutcome::Appended)
    }

    /// Remove every entry for a product, whatever its variant.
    ///
    /// Returns the number of entries removed.
    pub fn remove_item(&mut self, id: ProductId) -> usize {
        let len_before = self.items.len();
        self.items.retain(|i| i.id != id);
        len_before - self.items.len()
    }

    /// Remove the single entry keyed by `(id, variant)`.
    pub fn remove_variant(&mut self, id: ProductId, variant: &str) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| !i.is_keyed(id, variant));
        self.items.len() < len_before
    }

    /// Set the quantity of every entry for a product, whatever its variant.
    ///
    /// A quantity below one is ignored and reports zero updated entries.
    /// Returns the number of entries updated.
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) -> Result<usize, CartError> {
        let Some(quantity) = requested_quantity(quantity)? else {
            return Ok(0);
        };

        let mut updated = 0;
        for item in self.items.iter_mut().filter(|i| i.id == id) {
            item.quantity = quantity;
            updated += 1;
        }
        Ok(updated)
    }

    /// Set the quantity of the single entry keyed by `(id, variant)`.
    ///
    /// A quantity below one is ignored and reports `false`.
    pub fn update_variant_quantity(
        &mut self,
        id: ProductId,
        variant: &str,
        quantity: i64,
    ) -> Result<bool, CartError> {
        let Some(quantity) = requested_quantity(quantity)? else {
            return Ok(false);
        };

        match self
            .items
            .iter_mut()
            .find(|i| i.is_keyed(id, variant))
        {
            Some(item) => {
                item.quantity = quantity;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Clear all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Entries in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Get number of distinct entries.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of `price * quantity` over all entries.
    pub fn subtotal(&self) -> Money {
        Money::sum(self.items.iter().map(LineItem::line_total))
    }

    /// Get an entry by key.
    pub fn get(&self, id: ProductId, variant: &str) -> Option<&LineItem> {
        self.items
            .iter()
            .find(|i| i.is_keyed(id, variant))
    }

    /// Iterate over every entry for a product.
    pub fn entries_for(&self, id: ProductId) -> impl Iterator<Item = &LineItem> {
        self.items.iter().filter(move |i| i.id == id)
    }
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<LineItem>::deserialize(deserializer)?;
        Cart::from_items(items).map_err(serde::de::Error::custom)
    }
}

/// A line item in the cart.
///
/// Field order matches the persisted record:
/// `{"id", "name", "price", "image", "quantity", "variant"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineItem {
    /// Product ID.
    pub id: ProductId,
    /// Product name (denormalized for display).
    pub name: String,
    /// Unit price when the item was added.
    pub price: Money,
    /// Display asset reference.
    #[serde(default)]
    pub image: String,
    /// Quantity, at least one.
    pub quantity: u32,
    /// Variant name (e.g., "Standard Set").
    pub variant: String,
}

impl LineItem {
    /// Create a line item with quantity one in the default variant.
    pub fn new(id: ProductId, name: impl Into<String>, price: Money) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            image: String::new(),
            quantity: 1,
            variant: DEFAULT_VARIANT.to_string(),
        }
    }

    /// Set the variant.
    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = variant.into();
        self
    }

    /// Set the quantity.
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Set the image reference.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// The entry's unique key.
    pub fn key(&self) -> LineKey {
        LineKey::new(self.id, self.variant.clone())
    }

    /// Check whether this entry is keyed by the given product and variant.
    pub fn is_keyed(&self, id: ProductId, variant: &str) -> bool {
        self.id == id && self.variant == variant
    }

    /// Unit price times quantity.
    pub fn line_total(&self) -> Money {
        self.price.saturating_mul(self.quantity)
    }

    /// Check the per-entry invariants.
    pub fn validate(&self) -> Result<(), CartError> {
        if self.quantity < 1 {
            return Err(CartError::InvalidQuantity(i64::from(self.quantity)));
        }
        if self.quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CartError::QuantityExceedsLimit(
                u64::from(self.quantity),
                MAX_QUANTITY_PER_ITEM,
            ));
        }
        if self.price.is_negative() {
            return Err(CartError::InvalidPrice(self.price));
        }
        Ok(())
    }
}

/// Map a requested quantity to a stored one. `None` means "ignore".
fn requested_quantity(quantity: i64) -> Result<Option<u32>, CartError> {
    if quantity < 1 {
        return Ok(None);
    }
    checked_quantity(quantity.unsigned_abs()).map(Some)
}

fn checked_quantity(quantity: u64) -> Result<u32, CartError> {
    if quantity > u64::from(MAX_QUANTITY_PER_ITEM) {
        return Err(CartError::QuantityExceedsLimit(
            quantity,
            MAX_QUANTITY_PER_ITEM,
        ));
    }
    // Bounded by MAX_QUANTITY_PER_ITEM above.
    Ok(quantity as u32)
}
