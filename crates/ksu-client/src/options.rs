//! Caller-supplied request options.
//!
//! `RequestOptions` is the bag a caller hands to [`crate::GraphQlClient::fetch`]:
//! method, headers, body, and an optional credentials directive. The URL is
//! not part of it; every request goes to the configured endpoint.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, COOKIE};
use reqwest::Method;
use serde::Serialize;

use crate::error::FetchError;
use crate::graphql::GraphQlRequest;

/// Whether session cookies travel with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credentials {
    /// Never send or store cookies.
    Omit,
    /// Send cookies only to the caller's own origin.
    SameOrigin,
    /// Always send cookies and store any the server sets.
    Include,
}

/// Method, headers and body for one request.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
    /// `None` means the caller expressed no preference.
    pub credentials: Option<Credentials>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            body: None,
            credentials: None,
        }
    }
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// POST a GraphQL operation as a JSON body.
    pub fn graphql(request: &GraphQlRequest) -> Result<Self, FetchError> {
        Self::new().method(Method::POST).json(request)
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Set a header, replacing any previous value under the same name.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set a raw request body.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Encode `value` as the JSON body and set `Content-Type: application/json`.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, FetchError> {
        let body = serde_json::to_vec(value).map_err(FetchError::Serialization)?;
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.body = Some(body);
        Ok(self)
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Force `Credentials::Include`, whatever the caller asked for.
    ///
    /// A caller-supplied `Cookie` header is dropped as well: cookies only ever
    /// come from the session jar.
    pub fn include_credentials(mut self) -> Self {
        self.credentials = Some(Credentials::Include);
        self.headers.remove(COOKIE);
        self
    }
}
