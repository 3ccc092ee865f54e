//! KSU client error types.
//!
//! Only failures are represented here. A 403 is not an error: it resolves
//! through the sign-out collaborator (see [`crate::Fetched::SignedOut`]).

/// Errors from a fetch against the GraphQL endpoint.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Transport error while sending the request or reading the body.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Response body was not valid JSON for the expected type.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: serde_json::Error,
    },
    /// Request body could not be encoded as JSON.
    #[error("failed to serialize request body: {0}")]
    Serialization(#[source] serde_json::Error),
    /// The underlying HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    ClientInit(#[source] reqwest::Error),
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl FetchError {
    /// True when the failure came from parsing the response body.
    pub fn is_deserialization(&self) -> bool {
        matches!(self, Self::Deserialization { .. })
    }

    /// True when the failure happened in the transport layer.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http { .. })
    }
}
