//! CLI command implementations.

pub mod cart;
pub mod catalog;
pub mod config;

use cakeshop_cart::ProductId;
use clap::{Args, Subcommand, ValueEnum};

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: CartCommand,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show entries and checkout totals.
    Show,
    /// Add a product, merging with an existing entry of the same variant.
    Add {
        /// Product ID.
        #[arg(long)]
        id: ProductId,
        /// Product name.
        #[arg(long)]
        name: String,
        /// Unit price in major units (e.g. 160 or 49.99).
        #[arg(long)]
        price: f64,
        /// Image path or URL.
        #[arg(long, default_value = "")]
        image: String,
        /// Variant label.
        #[arg(long, default_value = "Standard")]
        variant: String,
        /// Quantity to add.
        #[arg(short, long, default_value = "1")]
        quantity: u32,
    },
    /// Remove a product (every variant unless one is given).
    Remove {
        /// Product ID.
        id: ProductId,
        /// Only remove this variant.
        #[arg(long)]
        variant: Option<String>,
    },
    /// Set the quantity of a product (every variant unless one is given).
    Update {
        /// Product ID.
        id: ProductId,
        /// New quantity. Values below 1 leave the cart unchanged.
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
        /// Only update this variant.
        #[arg(long)]
        variant: Option<String>,
    },
    /// Remove every entry.
    Clear {
        /// Skip confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

impl CartCommand {
    /// Whether the command writes to the cart.
    pub fn mutates(&self) -> bool {
        !matches!(self, Self::Show)
    }
}

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommand,
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// List product categories.
    Categories,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
        /// File format to write.
        #[arg(long, value_enum, default_value = "toml")]
        format: ConfigFormat,
    },
    /// Validate the config file.
    Validate,
}

/// Config file format.
#[derive(Clone, Copy, ValueEnum)]
pub enum ConfigFormat {
    /// Commented `cakeshop.toml`.
    Toml,
    /// `cakeshop.json` with default values.
    Json,
}
