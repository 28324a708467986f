//! Bearer token verification with transparent portal session refresh.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::{debug, warn};

use maluum_cache::SessionCache;
use maluum_core::config::AuthConfig;
use maluum_core::error::AppError;
use maluum_core::result::AppResult;
use maluum_core::traits::SessionAuthenticator;
use maluum_core::types::Credentials;

use super::claims::{Claims, TokenPayload};
use crate::cipher;

/// Validates bearer tokens and revalidates expired portal sessions.
#[derive(Clone)]
pub struct TokenVerifier {
    /// Ed25519 public key for signature checks.
    decoding_key: DecodingKey,
    /// Signature and issuer rules. Expiry is handled here, not by the JWT layer.
    validation: Validation,
    /// Coalescing session cache used on the expired path.
    cache: Arc<SessionCache>,
    /// Portal login used to refresh sessions.
    authenticator: Arc<dyn SessionAuthenticator>,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .field("authenticator", &self.authenticator)
            .finish()
    }
}

impl TokenVerifier {
    /// Creates a verifier from auth configuration.
    pub fn new(
        config: &AuthConfig,
        cache: Arc<SessionCache>,
        authenticator: Arc<dyn SessionAuthenticator>,
    ) -> AppResult<Self> {
        let pem = config.public_key()?;
        let decoding_key = DecodingKey::from_ed_pem(pem.as_bytes())
            .map_err(|e| AppError::configuration(format!("Invalid Ed25519 public key: {e}")))?;

        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss"]);

        Ok(Self {
            decoding_key,
            validation,
            cache,
            authenticator,
        })
    }

    /// Verify `token` under `caller_key` and return a live payload.
    pub async fn verify(&self, token: &str, caller_key: Option<&str>) -> AppResult<TokenPayload> {
        self.verify_at(token, caller_key, Utc::now()).await
    }

    /// [`TokenVerifier::verify`] with an explicit clock.
    ///
    /// Checks:
    /// 1. Caller key format
    /// 2. Signature and issuer
    /// 3. Decryption of the credential fields
    ///
    /// An expired token goes through the session cache, which logs in again
    /// at most once per user among concurrent callers. A live token returns
    /// its embedded session without touching the portal.
    pub async fn verify_at(
        &self,
        token: &str,
        caller_key: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<TokenPayload> {
        let key = cipher::resolve_caller_key(caller_key)?;
        let claims = self.decode_claims(token)?;

        let username = cipher::decrypt(&claims.username, key)?;
        let encoded_password = cipher::decrypt(&claims.password, key)?;

        if !claims.is_expired_at(now) {
            let session_token = cipher::decrypt(&claims.session, key)?;
            let password = decode_password(&encoded_password)?;
            return Ok(TokenPayload {
                username,
                password,
                session_token,
            });
        }

        debug!(username = %username, "Bearer token expired, revalidating portal session");

        let password = decode_password(&encoded_password)?;
        let credentials = Credentials::new(username.clone(), password.clone());
        let authenticator = Arc::clone(&self.authenticator);

        let session_token = self
            .cache
            .get_session(&username, move || async move {
                let session = authenticator.login(&credentials).await?;
                Ok((session.session_token, Utc::now()))
            })
            .await
            .inspect_err(|e| warn!(username = %username, error = %e, "Session refresh failed"))?;

        Ok(TokenPayload {
            username,
            password,
            session_token,
        })
    }

    /// Check the signature and issuer and return the raw claims.
    pub fn decode_claims(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::invalid_token("Invalid token signature")
                }
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                    AppError::invalid_token("Invalid token issuer")
                }
                _ => AppError::invalid_token(format!("Token validation failed: {e}")),
            },
        )?;

        Ok(token_data.claims)
    }
}

fn decode_password(encoded: &str) -> AppResult<String> {
    let bytes = STANDARD
        .decode(encoded.as_bytes())
        .map_err(|_| AppError::invalid_token("Malformed password claim"))?;
    String::from_utf8(bytes).map_err(|_| AppError::invalid_token("Malformed password claim"))
}
