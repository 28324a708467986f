//! Bearer token claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Claims carried by every bearer token.
///
/// The credential fields are ciphertexts produced by [`crate::cipher`]
/// under the caller's key; the signature protects them from tampering and
/// the cipher from disclosure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Not-before timestamp (seconds since epoch).
    pub nbf: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Issuer.
    pub iss: String,
    /// Encrypted portal username.
    pub username: String,
    /// Encrypted base64 of the portal password.
    pub password: String,
    /// Encrypted portal session token.
    pub session: String,
}

impl Claims {
    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Whether the token is expired at `now`.
    ///
    /// Inclusive: a token is already expired during the second named by
    /// `exp`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// Decrypted contents of a verified token.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPayload {
    /// Portal username.
    pub username: String,
    /// Portal password in plaintext.
    pub password: String,
    /// Live portal session token.
    pub session_token: String,
}

impl std::fmt::Debug for TokenPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPayload")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("session_token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_expiring(exp: i64) -> Claims {
        Claims {
            iat: exp,
            nbf: exp,
            exp,
            iss: "maluum".to_string(),
            username: String::new(),
            password: String::new(),
            session: String::new(),
        }
    }

    #[test]
    fn test_expiry_is_inclusive() {
        let now = Utc::now();
        let claims = claims_expiring(now.timestamp());
        assert!(claims.is_expired_at(now));
        assert!(!claims.is_expired_at(now - chrono::Duration::seconds(1)));
    }

    #[test]
    fn test_payload_debug_redacts() {
        let payload = TokenPayload {
            username: "alice".into(),
            password: "secret".into(),
            session_token: "xyz".into(),
        };
        let printed = format!("{payload:?}");
        assert!(!printed.contains("secret"));
        assert!(!printed.contains("xyz"));
    }
}
