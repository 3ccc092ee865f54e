//! The fetch wrapper.
//!
//! Every request goes to one configured endpoint with session credentials
//! forced on. A 403 short-circuits to the sign-out collaborator without
//! touching the body; every other status is parsed as JSON. Nothing is
//! retried and no status other than 403 is treated specially.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::KsuApiConfig;
use crate::error::FetchError;
use crate::graphql::GraphQlRequest;
use crate::options::RequestOptions;
use crate::session::SessionJar;
use crate::sign_out::{ClearSession, SignOut};

/// Outcome of a fetch that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T, S> {
    /// Body parsed as the caller's expected type.
    Data(T),
    /// Server answered 403; carries the sign-out collaborator's output.
    SignedOut(S),
}

impl<T, S> Fetched<T, S> {
    pub fn is_signed_out(&self) -> bool {
        matches!(self, Self::SignedOut(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Data(data) => Some(data),
            Self::SignedOut(_) => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Data(data) => Some(data),
            Self::SignedOut(_) => None,
        }
    }
}

/// Client bound to a single GraphQL endpoint.
///
/// Cloning is cheap; clones share the connection pool, the session jar and
/// the sign-out collaborator.
pub struct GraphQlClient<S = ClearSession> {
    http: reqwest::Client,
    endpoint: Url,
    session: Arc<SessionJar>,
    sign_out: Arc<S>,
}

// Manual impls: closures used as collaborators are neither `Clone` nor `Debug`.
impl<S> Clone for GraphQlClient<S> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            endpoint: self.endpoint.clone(),
            session: self.session.clone(),
            sign_out: self.sign_out.clone(),
        }
    }
}

impl<S> std::fmt::Debug for GraphQlClient<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphQlClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("cookies", &self.session.len())
            .finish_non_exhaustive()
    }
}

impl GraphQlClient<ClearSession> {
    /// Create a client with an empty session and the default sign-out
    /// behaviour (clear the session).
    pub fn new(config: KsuApiConfig) -> Result<Self, FetchError> {
        Self::with_session(config, Arc::new(SessionJar::new()))
    }

    /// Create a client from `KSU_*` environment variables.
    pub fn from_env() -> Result<Self, FetchError> {
        Self::new(KsuApiConfig::from_env()?)
    }

    /// Create a client around an existing session jar.
    pub fn with_session(
        config: KsuApiConfig,
        session: Arc<SessionJar>,
    ) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(FetchError::ClientInit)?;

        Ok(Self {
            http,
            endpoint: config.graphql_url,
            sign_out: Arc::new(ClearSession::new(session.clone())),
            session,
        })
    }
}

impl<S: SignOut> GraphQlClient<S> {
    /// Replace the sign-out collaborator.
    pub fn with_sign_out<S2: SignOut>(self, sign_out: S2) -> GraphQlClient<S2> {
        GraphQlClient {
            http: self.http,
            endpoint: self.endpoint,
            session: self.session,
            sign_out: Arc::new(sign_out),
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn session(&self) -> &Arc<SessionJar> {
        &self.session
    }

    /// Send `options` to the endpoint.
    ///
    /// Resolves to `Fetched::SignedOut` on 403, otherwise to the body parsed
    /// as `T`. Transport and parse failures are returned as errors.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        options: RequestOptions,
    ) -> Result<Fetched<T, S::Output>, FetchError> {
        let RequestOptions {
            method,
            headers,
            body,
            credentials: _,
        } = options.include_credentials();
        let endpoint = self.endpoint.as_str();

        let mut request = self
            .http
            .request(method.clone(), self.endpoint.clone())
            .headers(headers);
        if let Some(cookies) = self.session.cookie_header(&self.endpoint) {
            request = request.header(COOKIE, cookies);
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        tracing::debug!(%method, endpoint, "sending request");
        let resp = request.send().await.map_err(|e| FetchError::Http {
            endpoint: endpoint.into(),
            source: e,
        })?;

        let status = resp.status();
        tracing::debug!(status = status.as_u16(), endpoint, "received response");
        // Stored before the 403 branch so the sign-out hook sees the final session.
        self.session
            .store_set_cookies(&self.endpoint, resp.headers().get_all(SET_COOKIE));

        if status == StatusCode::FORBIDDEN {
            tracing::warn!(endpoint, "request forbidden, invoking sign-out");
            return Ok(Fetched::SignedOut(self.sign_out.sign_out()));
        }

        let bytes = resp.bytes().await.map_err(|e| FetchError::Http {
            endpoint: endpoint.into(),
            source: e,
        })?;
        let data = serde_json::from_slice(&bytes).map_err(|e| FetchError::Deserialization {
            endpoint: endpoint.into(),
            source: e,
        })?;
        Ok(Fetched::Data(data))
    }

    /// POST a GraphQL operation and parse the reply as `T`.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: &GraphQlRequest,
    ) -> Result<Fetched<T, S::Output>, FetchError> {
        self.fetch(RequestOptions::graphql(request)?).await
    }
}
