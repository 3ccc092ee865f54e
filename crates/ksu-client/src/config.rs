//! KSU API client configuration.
//!
//! The GraphQL endpoint defaults to production. Override via environment
//! variables or explicit construction for staging/testing.

use url::Url;

/// Production GraphQL endpoint.
pub const DEFAULT_GRAPHQL_URL: &str = "https://ksu.dawoony.com/graphql";

/// Configuration for connecting to the KSU GraphQL API.
#[derive(Debug, Clone)]
pub struct KsuApiConfig {
    /// Full URL of the GraphQL endpoint. Every request targets this URL.
    /// Default: <https://ksu.dawoony.com/graphql>
    pub graphql_url: Url,
    /// Request timeout in seconds. `None` leaves the transport default in place.
    pub timeout_secs: Option<u64>,
}

impl KsuApiConfig {
    /// Create a configuration targeting an explicit endpoint.
    pub fn new(graphql_url: Url) -> Self {
        Self {
            graphql_url,
            timeout_secs: None,
        }
    }

    /// Configuration for the production endpoint with no client timeout.
    pub fn production() -> Result<Self, ConfigError> {
        let graphql_url = Url::parse(DEFAULT_GRAPHQL_URL).map_err(|e| {
            ConfigError::InvalidUrl(DEFAULT_GRAPHQL_URL.to_string(), e.to_string())
        })?;
        Ok(Self::new(graphql_url))
    }

    /// Set a transport timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `KSU_GRAPHQL_URL` (default: `https://ksu.dawoony.com/graphql`)
    /// - `KSU_TIMEOUT_SECS` (default: unset, no client timeout)
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            graphql_url: env_url("KSU_GRAPHQL_URL", DEFAULT_GRAPHQL_URL)?,
            timeout_secs: std::env::var("KSU_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok()),
        })
    }

    /// Create a configuration pointing at a local mock server (for testing).
    ///
    /// `base` is the server root, e.g. `http://127.0.0.1:41235`; the
    /// endpoint becomes `{base}/graphql`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if `base` cannot be parsed.
    pub fn local_mock(base: &str) -> Result<Self, ConfigError> {
        let raw = format!("{}/graphql", base.trim_end_matches('/'));
        let graphql_url = Url::parse(&raw)
            .map_err(|e| ConfigError::InvalidUrl("local_mock".to_string(), e.to_string()))?;
        Ok(Self {
            graphql_url,
            timeout_secs: Some(5),
        })
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_targets_fixed_endpoint() {
        let cfg = KsuApiConfig::production().unwrap();
        assert_eq!(cfg.graphql_url.as_str(), DEFAULT_GRAPHQL_URL);
        assert_eq!(cfg.timeout_secs, None);
    }

    #[test]
    fn local_mock_appends_graphql_path() {
        let cfg = KsuApiConfig::local_mock("http://127.0.0.1:9000/").unwrap();
        assert_eq!(cfg.graphql_url.as_str(), "http://127.0.0.1:9000/graphql");
        assert_eq!(cfg.timeout_secs, Some(5));
    }

    #[test]
    fn local_mock_rejects_garbage() {
        assert!(KsuApiConfig::local_mock("not a url").is_err());
    }

    #[test]
    fn env_url_uses_default_when_var_absent() {
        let url = env_url("NONEXISTENT_VAR_KSU_12345", "https://example.com/graphql").unwrap();
        assert_eq!(url.as_str(), "https://example.com/graphql");
    }

    #[test]
    fn env_url_rejects_invalid_url() {
        std::env::set_var("TEST_BAD_URL_KSU", "not a url");
        let result = env_url("TEST_BAD_URL_KSU", "https://example.com");
        std::env::remove_var("TEST_BAD_URL_KSU");
        assert!(result.is_err());
    }

    #[test]
    fn with_timeout_secs_sets_timeout() {
        let cfg = KsuApiConfig::production().unwrap().with_timeout_secs(12);
        assert_eq!(cfg.timeout_secs, Some(12));
    }
}
