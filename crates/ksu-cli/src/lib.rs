//! # ksu-cli — Command-line client for the KSU GraphQL API
//!
//! Provides the `ksu` binary:
//!
//! ```bash
//! ksu query '{ me { id name } }'
//! ksu query @queries/me.graphql --variables '{"first": 10}' --cookie sid=abc
//! ksu --endpoint http://127.0.0.1:4000/graphql query '{ ok }'
//! ```
//!
//! Exit codes: `0` on a parsed response, [`EXIT_SIGNED_OUT`] when the server
//! answered 403, `1` on any error.

pub mod query;

use anyhow::{Context, Result};
use ksu_client::KsuApiConfig;
use url::Url;

/// Exit code used when the server rejected the session with 403.
pub const EXIT_SIGNED_OUT: u8 = 2;

/// Resolve client configuration: environment first, then CLI overrides.
pub fn resolve_config(endpoint: Option<&Url>, timeout_secs: Option<u64>) -> Result<KsuApiConfig> {
    let mut config = KsuApiConfig::from_env().context("loading KSU_* environment")?;
    if let Some(endpoint) = endpoint {
        config.graphql_url = endpoint.clone();
    }
    if let Some(secs) = timeout_secs {
        config.timeout_secs = Some(secs);
    }
    Ok(config)
}
