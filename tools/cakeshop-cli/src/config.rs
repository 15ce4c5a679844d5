//! CLI configuration.

use std::path::Path;

use anyhow::{bail, Context, Result};
use cakeshop_cart::{CartOptions, CartSeed, Currency, Money, ShippingPolicy, DEFAULT_CART_KEY};
use cakeshop_catalog::CatalogEndpoints;
use cakeshop_observability::LogConfig;
use serde::{Deserialize, Serialize};

/// File names searched for, in order, when no `--config` is given.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["cakeshop.toml", ".cakeshop.toml", "cakeshop.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Cart storage and pricing.
    #[serde(default)]
    pub cart: CartConfig,

    /// Catalog endpoints.
    #[serde(default)]
    pub catalog: CatalogEndpoints,

    /// Log output.
    #[serde(default)]
    pub logging: LogConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Check the config, returning `(errors, warnings)`.
    pub fn validate(&self) -> (Vec<String>, Vec<String>) {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if self.cart.key.is_empty() {
            errors.push("cart.key must not be empty".to_string());
        }
        if self.cart.storage_dir.is_empty() {
            errors.push("cart.storage_dir must not be empty".to_string());
        }
        if let Err(e) = self.cart.currency() {
            errors.push(e.to_string());
        }
        if let Err(e) = self.cart.shipping_policy() {
            errors.push(e.to_string());
        }

        for (name, url) in [
            ("catalog.base_url", &self.catalog.base_url),
            ("catalog.proxy_url", &self.catalog.proxy_url),
            ("catalog.direct_url", &self.catalog.direct_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                errors.push(format!("{} must be an http(s) URL, got '{}'", name, url));
            }
        }

        if self.catalog.timeout_ms == 0 {
            errors.push("catalog.timeout_ms must be greater than 0".to_string());
        } else if self.catalog.timeout_ms > 60_000 {
            warnings.push(format!(
                "catalog.timeout_ms is {} ms; each unreachable tier waits that long",
                self.catalog.timeout_ms
            ));
        }

        if self.cart.key != DEFAULT_CART_KEY {
            warnings.push(format!(
                "cart.key '{}' differs from the storefront's '{}'",
                self.cart.key, DEFAULT_CART_KEY
            ));
        }

        (errors, warnings)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "json")
}

/// Which entries a fresh cart starts with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedKind {
    #[default]
    Empty,
    Demo,
}

/// Cart section of the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartConfig {
    /// Directory holding the persisted slot.
    pub storage_dir: String,
    /// Slot key.
    pub key: String,
    /// Entries used when no valid slot exists.
    pub seed: SeedKind,
    /// Display currency code.
    pub currency: String,
    /// Flat shipping fee in major units. Zero means free shipping.
    pub shipping: f64,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_dir: ".cakeshop".to_string(),
            key: DEFAULT_CART_KEY.to_string(),
            seed: SeedKind::Empty,
            currency: Currency::BDT.code().to_string(),
            shipping: 60.0,
        }
    }
}

impl CartConfig {
    /// Parsed display currency.
    pub fn currency(&self) -> Result<Currency> {
        match Currency::from_code(&self.currency) {
            Some(currency) => Ok(currency),
            None => bail!("cart.currency '{}' is not a supported currency", self.currency),
        }
    }

    /// Shipping policy for checkout totals.
    pub fn shipping_policy(&self) -> Result<ShippingPolicy> {
        let fee = match Money::from_decimal_exact(self.shipping) {
            Some(fee) if !fee.is_negative() => fee,
            _ => bail!("cart.shipping must be a non-negative amount with at most two decimal places, got {}", self.shipping),
        };
        Ok(if fee.is_zero() {
            ShippingPolicy::Free
        } else {
            ShippingPolicy::Flat(fee)
        })
    }

    /// Store options for this section.
    pub fn options(&self) -> CartOptions {
        let seed = match self.seed {
            SeedKind::Empty => CartSeed::Empty,
            SeedKind::Demo => CartSeed::Demo,
        };
        CartOptions::default().with_key(self.key.clone()).with_seed(seed)
    }
}

/// Generate a default cakeshop.toml config file.
pub fn generate_default_config() -> String {
    r#"# Cakeshop configuration

[cart]
storage_dir = ".cakeshop"
key = "cart"
# "empty" or "demo"
seed = "empty"
currency = "BDT"
shipping = 60.0

[catalog]
base_url = "http://localhost:4000"
proxy_url = "http://localhost:3000/api/proxy/api/Category/GetAll"
direct_url = "http://localhost:3000/api/direct-categories"
timeout_ms = 5000

[logging]
# trace, debug, info, warn or error; RUST_LOG overrides
level = "warn"
# "human" or "json"
format = "human"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cakeshop_observability::{LogFormat, LogLevel};

    #[test]
    fn test_default_template_matches_defaults() {
        let parsed: CliConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(parsed, CliConfig::default());
    }

    #[test]
    fn test_partial_sections_use_defaults() {
        let parsed: CliConfig = toml::from_str(
            r#"
            [cart]
            seed = "demo"

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.cart.seed, SeedKind::Demo);
        assert_eq!(parsed.cart.key, "cart");
        assert_eq!(parsed.catalog, CatalogEndpoints::default());
        assert_eq!(parsed.logging.level, LogLevel::Warn);
        assert_eq!(parsed.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_save_and_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cakeshop.json");

        let mut config = CliConfig::default();
        config.cart.shipping = 0.0;
        config.save(&path).unwrap();

        let loaded = CliConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.cart.shipping_policy().unwrap(), ShippingPolicy::Free);
    }

    #[test]
    fn test_save_and_load_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cakeshop.toml");

        let mut config = CliConfig::default();
        config.catalog.timeout_ms = 1500;
        config.save(&path).unwrap();

        assert_eq!(CliConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cakeshop.toml");
        std::fs::write(&path, "[cart\nkey = ").unwrap();

        let err = CliConfig::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse TOML config"));
    }

    #[test]
    fn test_validate() {
        assert_eq!(CliConfig::default().validate(), (vec![], vec![]));

        let mut config = CliConfig::default();
        config.cart.currency = "XYZ".into();
        config.cart.shipping = -5.0;
        config.catalog.proxy_url = "/api/proxy".into();
        config.catalog.timeout_ms = 0;
        let (errors, warnings) = config.validate();
        assert_eq!(errors.len(), 4);
        assert!(warnings.is_empty());

        let mut config = CliConfig::default();
        config.cart.key = "cart:guest".into();
        let (errors, warnings) = config.validate();
        assert!(errors.is_empty());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_cart_options() {
        let mut section = CartConfig::default();
        assert_eq!(section.options().seed, CartSeed::Empty);
        assert_eq!(
            section.shipping_policy().unwrap(),
            ShippingPolicy::Flat(Money::from_major(60))
        );

        section.seed = SeedKind::Demo;
        section.key = "guest".into();
        let options = section.options();
        assert_eq!(options.seed, CartSeed::Demo);
        assert_eq!(options.key, "guest");
    }

    #[test]
    fn test_sub_cent_shipping_is_rejected() {
        let mut section = CartConfig::default();
        section.shipping = 60.005;
        let err = section.shipping_policy().unwrap_err();
        assert!(err.to_string().contains("at most two decimal places"));
    }
}
