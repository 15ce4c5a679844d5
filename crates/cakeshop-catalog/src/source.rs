//! Places categories can be fetched from.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

use crate::category::{normalize_all, Category, RawCategory};
use crate::error::FetchError;
use crate::timeout::TimeoutConfig;

/// Position of a source in the fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    /// The catalog backend itself.
    Primary,
    /// Storefront proxy in front of the backend.
    Proxy,
    /// Storefront route that reads the backend directly.
    Direct,
    /// Built-in static dataset.
    Mock,
}

impl Tier {
    /// Get the tier name.
    pub fn name(&self) -> &'static str {
        match self {
            Tier::Primary => "primary",
            Tier::Proxy => "proxy",
            Tier::Direct => "direct",
            Tier::Mock => "mock",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A source of categories.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Tier this source serves.
    fn tier(&self) -> Tier;

    /// Fetch and normalize the category list.
    async fn fetch(&self) -> Result<Vec<Category>, FetchError>;
}

/// How strictly a response is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeCheck {
    /// Status must be 2xx, `succeeded` must be `true` and `data` must be an array.
    Strict,
    /// Only `data` must be an array, whatever the status.
    DataArray,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    succeeded: Option<bool>,
    #[serde(default)]
    data: Option<Value>,
}

/// Parse a response body into categories.
pub fn parse_categories(body: &[u8], check: EnvelopeCheck, url: &str) -> Result<Vec<Category>, FetchError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(FetchError::EmptyBody(url.to_string()));
    }

    let envelope: Envelope =
        serde_json::from_slice(body).map_err(|e| FetchError::Deserialization(e.to_string()))?;

    if check == EnvelopeCheck::Strict && envelope.succeeded != Some(true) {
        return Err(FetchError::InvalidEnvelope(format!(
            "{}: request did not succeed",
            url
        )));
    }

    let items = match envelope.data {
        Some(Value::Array(items)) => items,
        _ => {
            return Err(FetchError::InvalidEnvelope(format!(
                "{}: data is not an array",
                url
            )))
        }
    };

    let raw = items
        .into_iter()
        .map(serde_json::from_value::<RawCategory>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| FetchError::Deserialization(e.to_string()))?;

    Ok(normalize_all(raw))
}

/// JSON endpoint returning a `{ succeeded, data }` envelope.
#[derive(Debug, Clone)]
pub struct HttpSource {
    tier: Tier,
    url: String,
    check: EnvelopeCheck,
    client: reqwest::Client,
}

impl HttpSource {
    /// Create a source for `url`, bounded by `timeout`.
    pub fn new(
        tier: Tier,
        url: impl Into<String>,
        check: EnvelopeCheck,
        timeout: TimeoutConfig,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout.connect)
            .timeout(timeout.total)
            .build()
            .map_err(|e| FetchError::Connection(e.to_string()))?;

        Ok(Self {
            tier,
            url: url.into(),
            check,
            client,
        })
    }

    /// Endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CatalogSource for HttpSource {
    fn tier(&self) -> Tier {
        self.tier
    }

    async fn fetch(&self) -> Result<Vec<Category>, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| FetchError::from_transport(e, &self.url))?;

        // Storefront routes may answer with an error status and still carry
        // a usable body, so only the backend itself is held to a 2xx.
        let status = response.status();
        if !status.is_success() {
            if self.check == EnvelopeCheck::Strict {
                return Err(FetchError::Http {
                    status: status.as_u16(),
                    url: self.url.clone(),
                });
            }
            tracing::debug!(tier = %self.tier, status = status.as_u16(), "reading body of error response");
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_transport(e, &self.url))?;

        parse_categories(&body, self.check, &self.url)
    }
}
