//! Cart error types.

use thiserror::Error;

use crate::ids::LineKey;
use crate::money::Money;

/// Errors that can occur in cart operations.
#[derive(Error, Debug)]
pub enum CartError {
    /// Quantity below one.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Negative unit price.
    #[error("Invalid price: {0}")]
    InvalidPrice(Money),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(u64, u32),

    /// Two entries share the same product and variant.
    #[error("Duplicate cart entry: {0}")]
    DuplicateEntry(LineKey),

    /// Persisted slot could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] cakeshop_cache::CacheError),
}
