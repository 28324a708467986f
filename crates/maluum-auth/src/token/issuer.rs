//! Bearer token minting with Ed25519 signatures.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use tracing::debug;

use maluum_core::config::AuthConfig;
use maluum_core::error::AppError;
use maluum_core::result::AppResult;
use maluum_core::types::Credentials;

use super::claims::Claims;
use crate::cipher;

/// A freshly minted bearer token.
#[derive(Clone)]
pub struct IssuedToken {
    /// The signed token string handed to the client.
    pub token: String,
    /// Plaintext session token, for use within the same request.
    pub session_token: String,
}

impl std::fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedToken")
            .field("token", &self.token)
            .field("session_token", &"<redacted>")
            .finish()
    }
}

/// Signs bearer tokens carrying encrypted portal credentials.
#[derive(Clone)]
pub struct TokenIssuer {
    /// Ed25519 private key for signing.
    encoding_key: EncodingKey,
    /// Issuer claim.
    issuer: String,
    /// Key hint written as the `kid` header.
    key_id: String,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("issuer", &self.issuer)
            .field("key_id", &self.key_id)
            .finish()
    }
}

impl TokenIssuer {
    /// Creates an issuer from auth configuration.
    pub fn new(config: &AuthConfig) -> AppResult<Self> {
        let pem = config.private_key()?;
        let encoding_key = EncodingKey::from_ed_pem(pem.as_bytes()).map_err(|e| {
            AppError::configuration(format!("Invalid Ed25519 private key: {e}"))
        })?;

        Ok(Self {
            encoding_key,
            issuer: config.issuer.clone(),
            key_id: config.key_id.clone(),
        })
    }

    /// Mint a token for `session_token` and `credentials`, encrypting the
    /// sensitive fields under `caller_key` (`None` means the default key).
    pub fn issue(
        &self,
        session_token: &str,
        credentials: &Credentials,
        caller_key: Option<&str>,
    ) -> AppResult<IssuedToken> {
        self.issue_at(session_token, credentials, caller_key, Utc::now())
    }

    /// [`TokenIssuer::issue`] with an explicit clock.
    ///
    /// The token expires at the instant it is issued, so every later
    /// verification revalidates the portal session.
    pub fn issue_at(
        &self,
        session_token: &str,
        credentials: &Credentials,
        caller_key: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<IssuedToken> {
        let key = cipher::resolve_caller_key(caller_key)?;
        let issued_at = now.timestamp();

        let claims = Claims {
            iat: issued_at,
            nbf: issued_at,
            exp: issued_at,
            iss: self.issuer.clone(),
            username: cipher::encrypt(&credentials.username, key)?,
            password: cipher::encrypt(&STANDARD.encode(&credentials.password), key)?,
            session: cipher::encrypt(session_token, key)?,
        };

        let mut header = Header::new(Algorithm::EdDSA);
        header.kid = Some(self.key_id.clone());

        let token = encode(&header, &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign bearer token: {e}")))?;

        debug!(username = %credentials.username, "Bearer token issued");

        Ok(IssuedToken {
            token,
            session_token: session_token.to_string(),
        })
    }

    /// The configured issuer claim.
    pub fn issuer(&self) -> &str {
        &self.issuer
    }
}
