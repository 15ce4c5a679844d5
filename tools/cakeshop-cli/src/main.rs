//! Cakeshop CLI - Manage the storefront cart and browse the catalog.
//!
//! Commands:
//! - `cakeshop cart` - Show and edit the persisted cart
//! - `cakeshop catalog` - Fetch categories through the fallback chain
//! - `cakeshop config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cakeshop_observability::{init_logging, LogConfig, LogFormat, LogLevel};

use commands::{CartArgs, CatalogArgs, ConfigArgs};

/// Cakeshop CLI - Shopping cart and catalog tools
#[derive(Parser)]
#[command(name = "cakeshop")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error); overrides config and --verbose
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Log format (human, json); overrides config
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Apply command line overrides to the configured logging section.
    fn log_config(&self, base: &LogConfig) -> LogConfig {
        let mut config = base.clone();
        if let Some(level) = self.log_level {
            config = config.with_level(level);
        } else if self.verbose {
            let level = config.level.more_verbose();
            config = config.with_level(level);
        }
        if let Some(format) = self.log_format {
            config = config.with_format(format);
        }
        config
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show and edit the cart
    Cart(CartArgs),

    /// Browse the product catalog
    Catalog(CatalogArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);

    let ctx = match context::Context::load(cli.config.as_deref(), output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    let logging = cli.log_config(&ctx.config.logging);
    if let Err(e) = init_logging(&logging) {
        ctx.output.debug(&e.to_string());
    }

    let result = match cli.command {
        Commands::Cart(args) => commands::cart::run(args, &ctx).await,
        Commands::Catalog(args) => commands::catalog::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
