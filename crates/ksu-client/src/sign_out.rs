//! Sign-out collaborator invoked when the server answers 403.
//!
//! The client hands the collaborator's return value back to the caller in
//! place of a parsed body. Any `Fn() -> O` works; [`ClearSession`] is the
//! default and wipes the session jar.

use std::sync::Arc;

use crate::session::SessionJar;

/// Zero-argument hook run on an authorization failure.
pub trait SignOut: Send + Sync {
    type Output: Send;

    fn sign_out(&self) -> Self::Output;
}

impl<F, O> SignOut for F
where
    F: Fn() -> O + Send + Sync,
    O: Send,
{
    type Output = O;

    fn sign_out(&self) -> O {
        self()
    }
}

/// Result of [`ClearSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedOut {
    pub cleared_cookies: usize,
}

/// Default collaborator: forget every session cookie.
#[derive(Debug, Clone)]
pub struct ClearSession {
    jar: Arc<SessionJar>,
}

impl ClearSession {
    pub fn new(jar: Arc<SessionJar>) -> Self {
        Self { jar }
    }
}

impl SignOut for ClearSession {
    type Output = SignedOut;

    fn sign_out(&self) -> SignedOut {
        let cleared_cookies = self.jar.clear();
        tracing::warn!(cleared_cookies, "session rejected, signed out");
        SignedOut { cleared_cookies }
    }
}
