//! Tiered fallback for category retrieval.
//!
//! Sources are tried in order; the first one that answers with a valid
//! category list wins. When all of them fail the built-in dataset is served,
//! so a catalog request never fails outright.

use serde::{Deserialize, Serialize};

use crate::category::{mock_categories, Category};
use crate::error::FetchError;
use crate::source::{CatalogSource, EnvelopeCheck, HttpSource, Tier};
use crate::timeout::TimeoutConfig;

/// Default catalog backend.
pub const DEFAULT_BASE_URL: &str = "http://localhost:4000";

/// Default storefront proxy endpoint.
pub const DEFAULT_PROXY_URL: &str = "http://localhost:3000/api/proxy/api/Category/GetAll";

/// Default storefront direct endpoint.
pub const DEFAULT_DIRECT_URL: &str = "http://localhost:3000/api/direct-categories";

/// Path of the category listing on the backend.
pub const CATEGORY_PATH: &str = "/api/Category/GetAll";

/// Endpoints of the standard chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogEndpoints {
    pub base_url: String,
    pub proxy_url: String,
    pub direct_url: String,
    pub timeout_ms: u64,
}

impl CatalogEndpoints {
    /// Primary endpoint URL.
    pub fn primary_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), CATEGORY_PATH)
    }
}

impl Default for CatalogEndpoints {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            proxy_url: DEFAULT_PROXY_URL.to_string(),
            direct_url: DEFAULT_DIRECT_URL.to_string(),
            timeout_ms: 5000,
        }
    }
}

/// A tier that failed during a chain run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierFailure {
    pub tier: Tier,
    pub error: String,
}

/// Result of running the chain.
#[derive(Debug, Clone)]
pub struct CatalogResponse {
    pub categories: Vec<Category>,
    /// Tier that produced `categories`.
    pub served_by: Tier,
    /// Tiers tried before `served_by`, in order.
    pub failures: Vec<TierFailure>,
}

impl CatalogResponse {
    /// Whether the static dataset was served.
    pub fn is_degraded(&self) -> bool {
        self.served_by == Tier::Mock
    }
}

/// Ordered list of category sources ending in the static dataset.
#[derive(Default)]
pub struct FallbackChain {
    sources: Vec<Box<dyn CatalogSource>>,
}

impl FallbackChain {
    /// Create an empty chain. It serves the static dataset until sources are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the standard primary, proxy, direct chain.
    ///
    /// A zero `timeout_ms` is rejected: every request would time out at once
    /// and the chain would always end in the static dataset.
    pub fn from_endpoints(endpoints: &CatalogEndpoints) -> Result<Self, FetchError> {
        if endpoints.timeout_ms == 0 {
            return Err(FetchError::Config(
                "timeout_ms must be greater than zero".to_string(),
            ));
        }
        let timeout = TimeoutConfig::from_millis(endpoints.timeout_ms);
        Ok(Self::new()
            .with_source(HttpSource::new(
                Tier::Primary,
                endpoints.primary_url(),
                EnvelopeCheck::Strict,
                timeout,
            )?)
            .with_source(HttpSource::new(
                Tier::Proxy,
                endpoints.proxy_url.clone(),
                EnvelopeCheck::DataArray,
                timeout,
            )?)
            .with_source(HttpSource::new(
                Tier::Direct,
                endpoints.direct_url.clone(),
                EnvelopeCheck::DataArray,
                timeout,
            )?))
    }

    /// Append a source.
    pub fn with_source(mut self, source: impl CatalogSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Number of sources before the static dataset.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Check if the chain has no sources.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Run the chain.
    pub async fn categories(&self) -> CatalogResponse {
        let mut failures = Vec::new();

        for source in &self.sources {
            let tier = source.tier();
            match source.fetch().await {
                Ok(categories) => {
                    tracing::info!(tier = %tier, count = categories.len(), "categories loaded");
                    return CatalogResponse {
                        categories,
                        served_by: tier,
                        failures,
                    };
                }
                Err(e) => {
                    tracing::warn!(tier = %tier, error = %e, "category source failed");
                    failures.push(TierFailure {
                        tier,
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::warn!("all category sources failed, serving built-in categories");
        CatalogResponse {
            categories: mock_categories(),
            served_by: Tier::Mock,
            failures,
        }
    }
}

impl std::fmt::Debug for FallbackChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tiers: Vec<Tier> = self.sources.iter().map(|s| s.tier()).collect();
        f.debug_struct("FallbackChain").field("tiers", &tiers).finish()
    }
}
