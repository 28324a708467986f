//! Portal credentials and acquired sessions.

use std::fmt;

/// Portal username and password.
///
/// Lives only for the duration of a request; `Debug` never prints the
/// password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Portal username (matric number).
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

impl Credentials {
    /// Create a credential pair.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A successful portal login: the session cookie value plus the
/// credentials that produced it, so callers can re-authenticate later.
#[derive(Clone)]
pub struct AuthenticatedSession {
    /// Value of the portal session cookie.
    pub session_token: String,
    /// Credentials used for the login.
    pub credentials: Credentials,
}

impl fmt::Debug for AuthenticatedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedSession")
            .field("session_token", &"<redacted>")
            .field("credentials", &self.credentials)
            .finish()
    }
}
