//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand, ConfigFormat};
use crate::config::{generate_default_config, CliConfig};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force, format } => init_config(force, format, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match ctx.config_path {
        Some(ref path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let cart = &ctx.config.cart;
    ctx.output.info("");
    ctx.output.info("[cart]");
    ctx.output
        .kv("storage_dir", &ctx.storage_dir().display().to_string());
    ctx.output.kv("key", &cart.key);
    ctx.output.kv("seed", &format!("{:?}", cart.seed).to_lowercase());
    ctx.output.kv("currency", &cart.currency);
    ctx.output.kv("shipping", &cart.shipping.to_string());

    let catalog = &ctx.config.catalog;
    ctx.output.info("");
    ctx.output.info("[catalog]");
    ctx.output.kv("base_url", &catalog.base_url);
    ctx.output.kv("primary", &catalog.primary_url());
    ctx.output.kv("proxy_url", &catalog.proxy_url);
    ctx.output.kv("direct_url", &catalog.direct_url);
    ctx.output.kv("timeout_ms", &catalog.timeout_ms.to_string());

    let logging = &ctx.config.logging;
    ctx.output.info("");
    ctx.output.info("[logging]");
    ctx.output.kv("level", logging.level.as_directive());
    ctx.output
        .kv("format", &format!("{:?}", logging.format).to_lowercase());

    Ok(())
}

fn init_config(force: bool, format: ConfigFormat, ctx: &Context) -> Result<()> {
    let config_path = match format {
        ConfigFormat::Toml => ctx.cwd.join("cakeshop.toml"),
        ConfigFormat::Json => ctx.cwd.join("cakeshop.json"),
    };

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    match format {
        ConfigFormat::Toml => fs::write(&config_path, generate_default_config())?,
        ConfigFormat::Json => CliConfig::default().save(&config_path)?,
    }

    ctx.output
        .success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = ctx.config.validate();

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "valid": errors.is_empty(),
            "errors": errors,
            "warnings": warnings,
        }));
    }

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}
