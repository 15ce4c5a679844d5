//! Category catalog retrieval.
//!
//! This crate provides:
//! - `Category` - Normalized catalog category
//! - `CatalogSource` - One place categories can be fetched from
//! - `HttpSource` - JSON endpoint with timeouts and envelope checks
//! - `FallbackChain` - Primary, proxy and direct endpoints, then a static dataset
//! - `TimeoutConfig` - Per-request timeouts

mod category;
mod error;
mod fallback;
mod source;
mod timeout;

pub use category::*;
pub use error::*;
pub use fallback::*;
pub use source::*;
pub use timeout::*;
