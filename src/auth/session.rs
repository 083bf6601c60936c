//! The explicit per-request session value.
//!
//! Authorization is a parameter, not ambient state: route handlers receive
//! the [Identity] produced by [Session::require_authenticated] and pass it
//! verbatim into every ledger and report call as the ownership filter.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::Error;

/// A newtype wrapper for the username associated with an authenticated
/// session.
///
/// This helps disambiguate the ownership key from other strings flowing
/// through handlers, leading to better compile time errors.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity(String);

impl Identity {
    /// Create a new identity from a username.
    pub fn new(username: impl Into<String>) -> Self {
        Self(username.into())
    }

    /// The username as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The authentication state for one interactive session.
///
/// A session starts anonymous, is authenticated by [Session::log_in] and
/// cleared by [Session::log_out]. It is carried between requests in the
/// private cookie jar (see [super::write_session] and
/// [super::read_session]) and is never persisted server-side.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    identity: Option<Identity>,
}

impl Session {
    /// A session with no authenticated identity.
    pub const fn anonymous() -> Self {
        Self { identity: None }
    }

    /// A session already authenticated as `identity`.
    pub fn authenticated(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    /// Mark the session as authenticated as `identity`.
    ///
    /// There is no check that the session is already active: calling this
    /// again with a different identity replaces the previous one (last call
    /// wins).
    pub fn log_in(&mut self, identity: Identity) {
        self.identity = Some(identity);
    }

    /// Clear the authenticated identity, returning the session to the
    /// anonymous state.
    pub fn log_out(&mut self) {
        self.identity = None;
    }

    /// The active identity, or `None` for an anonymous session.
    pub fn current(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// The active identity, or [Error::Unauthorized] for an anonymous
    /// session.
    ///
    /// Callers must halt further processing on this failure; in particular,
    /// no storage access may happen for an anonymous session.
    pub fn require_authenticated(&self) -> Result<Identity, Error> {
        self.identity.clone().ok_or(Error::Unauthorized)
    }
}
