//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use cakeshop_cache::{Cache, FileStore};
use cakeshop_cart::CartStore;
use cakeshop_catalog::FallbackChain;

use crate::config::{CliConfig, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            let path = resolve(&cwd, path);
            (CliConfig::load(&path)?, Some(path))
        } else {
            match find_config(&cwd)? {
                Some((config, path)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            }
        };

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Directory holding the cart slot.
    pub fn storage_dir(&self) -> PathBuf {
        resolve(&self.cwd, &self.config.cart.storage_dir)
    }

    /// Open the persisted cart.
    pub fn open_cart(&self) -> Result<CartStore> {
        let dir = self.storage_dir();
        let store = FileStore::open(&dir)
            .with_context(|| format!("Failed to open cart storage: {}", dir.display()))?;
        let cart = CartStore::open(Cache::new(Arc::new(store)), self.config.cart.options());
        tracing::debug!(
            key = cart.key(),
            hydration = cart.hydration().name(),
            dir = %dir.display(),
            "cart opened"
        );
        self.output.debug(&format!(
            "cart '{}' {} from {}",
            cart.key(),
            cart.hydration().name(),
            dir.display()
        ));
        Ok(cart)
    }

    /// Build the catalog fallback chain.
    pub fn catalog_chain(&self) -> Result<FallbackChain> {
        tracing::debug!(
            base_url = %self.config.catalog.base_url,
            timeout_ms = self.config.catalog.timeout_ms,
            "building catalog chain"
        );
        FallbackChain::from_endpoints(&self.config.catalog)
            .context("Failed to build catalog chain")
    }
}

/// Find config file in directory tree.
///
/// The nearest file wins. A file that exists but cannot be loaded is an
/// error rather than a reason to keep searching.
fn find_config(start: &Path) -> Result<Option<(CliConfig, PathBuf)>> {
    let mut current = start.to_path_buf();
    loop {
        for name in CONFIG_FILE_NAMES {
            let config_path = current.join(name);
            if config_path.exists() {
                let config = CliConfig::load(&config_path)?;
                return Ok(Some((config, config_path)));
            }
        }

        if !current.pop() {
            break;
        }
    }

    Ok(None)
}

/// Resolve a path relative to `base`.
fn resolve(base: &Path, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_config_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(
            dir.path().join("cakeshop.toml"),
            "[cart]\nkey = \"found\"\n",
        )
        .unwrap();

        let (config, path) = find_config(&nested).unwrap().unwrap();
        assert_eq!(config.cart.key, "found");
        assert_eq!(path, dir.path().join("cakeshop.toml"));
    }

    #[test]
    fn test_find_config_prefers_nearest() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("shop");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("cakeshop.toml"), "[cart]\nkey = \"outer\"\n").unwrap();
        std::fs::write(nested.join("cakeshop.json"), r#"{"cart": {"key": "inner"}}"#).unwrap();

        let (config, _) = find_config(&nested).unwrap().unwrap();
        assert_eq!(config.cart.key, "inner");
    }

    #[test]
    fn test_find_config_reports_unparsable_file() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("shop");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("cakeshop.toml"), "[cart]\nkey = \"outer\"\n").unwrap();
        std::fs::write(nested.join("cakeshop.toml"), "[cart\nkey = ").unwrap();

        let err = find_config(&nested).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse TOML config"));
    }

    #[test]
    fn test_resolve() {
        let base = Path::new("/srv/shop");
        assert_eq!(resolve(base, ".cakeshop"), PathBuf::from("/srv/shop/.cakeshop"));
        assert_eq!(resolve(base, "/var/lib/cart"), PathBuf::from("/var/lib/cart"));
    }

    #[test]
    fn test_open_cart_uses_storage_dir() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context {
            config: CliConfig::default(),
            config_path: None,
            output: Output::new(false, true),
            cwd: dir.path().to_path_buf(),
        };

        let mut cart = ctx.open_cart().unwrap();
        cart.add_item(cakeshop_cart::LineItem::new(
            cakeshop_cart::ProductId::new(1),
            "Nozzles",
            cakeshop_cart::Money::from_major(160),
        ))
        .unwrap();

        assert!(dir.path().join(".cakeshop").join("cart.json").is_file());
        assert_eq!(ctx.open_cart().unwrap().cart_count(), 1);
    }
}
