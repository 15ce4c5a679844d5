//! Error type for catalog fetches.

/// Error type for fetch operations.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Empty response body from {0}")]
    EmptyBody(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Invalid response envelope: {0}")]
    InvalidEnvelope(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl FetchError {
    /// Classify a transport error from the HTTP client.
    pub(crate) fn from_transport(err: reqwest::Error, url: &str) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(url.to_string())
        } else if err.is_decode() {
            FetchError::Deserialization(err.to_string())
        } else {
            FetchError::Connection(format!("{}: {}", url, err))
        }
    }

    /// Whether the endpoint answered at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Timeout(_) | FetchError::Connection(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FetchError::Http {
            status: 503,
            url: "http://localhost:4000/api/Category/GetAll".into(),
        };
        assert_eq!(
            err.to_string(),
            "HTTP error: 503 for http://localhost:4000/api/Category/GetAll"
        );
        assert!(!err.is_transport());
        assert!(FetchError::Timeout("x".into()).is_transport());
    }
}
