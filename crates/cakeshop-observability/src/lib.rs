//! Observability for Cakeshop.
//!
//! This crate provides:
//! - `LogLevel` / `LogFormat` - Configurable verbosity and output format
//! - `LogConfig` - Logging section of the application config
//! - `init_logging` - Install the global `tracing` subscriber

mod logging;

pub use logging::*;
