//! Portal session acquisition seam.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::credentials::{AuthenticatedSession, Credentials};

/// Acquires a fresh upstream session for a set of credentials.
///
/// Implementations perform exactly one login attempt per call and hold no
/// state between calls. Rejected credentials surface as `LoginFailed`,
/// transport problems as `AcquisitionFailed`.
#[async_trait]
pub trait SessionAuthenticator: Send + Sync + std::fmt::Debug + 'static {
    /// Log in and return the portal session token.
    async fn login(&self, credentials: &Credentials) -> AppResult<AuthenticatedSession>;

    /// End an upstream session. The default does nothing.
    async fn logout(&self, _session_token: &str) -> AppResult<()> {
        Ok(())
    }
}
