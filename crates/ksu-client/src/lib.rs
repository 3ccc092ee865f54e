//! # ksu-client -- GraphQL fetch client for the KSU API
//!
//! A thin wrapper around one HTTP exchange with the KSU GraphQL endpoint
//! (`https://ksu.dawoony.com/graphql` by default):
//!
//! - Session cookies are **always** sent, whatever credentials directive the
//!   caller put in its [`RequestOptions`].
//! - A `403 Forbidden` runs the injected [`SignOut`] collaborator and resolves
//!   with its output ([`Fetched::SignedOut`]); the body is never read.
//! - Any other status, 401 and 5xx included, has its body parsed as JSON into
//!   the caller's expected type ([`Fetched::Data`]).
//!
//! Transport and parse failures surface as [`FetchError`]. There is no retry.
//!
//! ```rust,ignore
//! use ksu_client::{GraphQlClient, GraphQlRequest, KsuApiConfig};
//!
//! let client = GraphQlClient::new(KsuApiConfig::from_env()?)?;
//! let reply: ksu_client::Fetched<serde_json::Value, _> = client
//!     .execute(&GraphQlRequest::new("{ me { id name } }"))
//!     .await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod graphql;
pub mod options;
pub mod session;
pub mod sign_out;

pub use client::{Fetched, GraphQlClient};
pub use config::{ConfigError, KsuApiConfig, DEFAULT_GRAPHQL_URL};
pub use error::FetchError;
pub use graphql::{GraphQlError, GraphQlRequest, GraphQlResponse};
pub use options::{Credentials, RequestOptions};
pub use session::SessionJar;
pub use sign_out::{ClearSession, SignOut, SignedOut};
