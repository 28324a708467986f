//! Bearer token signing configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// Signing keys and claims for issued bearer tokens.
///
/// Keys are Ed25519 in PEM form: PKCS#8 for the private key, SPKI for the
/// public key. Either inline PEM text or a path may be given; inline text
/// wins when both are set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Issuer claim written on mint and required on verify.
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Key hint written to the token header (`kid`).
    #[serde(default = "default_key_id")]
    pub key_id: String,
    /// Inline PKCS#8 PEM private key.
    #[serde(default)]
    pub private_key_pem: String,
    /// Path to a PKCS#8 PEM private key.
    #[serde(default)]
    pub private_key_path: Option<String>,
    /// Inline SPKI PEM public key.
    #[serde(default)]
    pub public_key_pem: String,
    /// Path to an SPKI PEM public key.
    #[serde(default)]
    pub public_key_path: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            issuer: default_issuer(),
            key_id: default_key_id(),
            private_key_pem: String::new(),
            private_key_path: None,
            public_key_pem: String::new(),
            public_key_path: None,
        }
    }
}

impl AuthConfig {
    /// Resolve the private key PEM from inline text or file.
    pub fn private_key(&self) -> AppResult<String> {
        resolve_pem("private", &self.private_key_pem, self.private_key_path.as_deref())
    }

    /// Resolve the public key PEM from inline text or file.
    pub fn public_key(&self) -> AppResult<String> {
        resolve_pem("public", &self.public_key_pem, self.public_key_path.as_deref())
    }
}

fn resolve_pem(which: &str, inline: &str, path: Option<&str>) -> AppResult<String> {
    if !inline.trim().is_empty() {
        return Ok(inline.to_string());
    }
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            AppError::configuration(format!("Failed to read {which} key from '{path}': {e}"))
        }),
        None => Err(AppError::configuration(format!(
            "No {which} signing key configured"
        ))),
    }
}

fn default_issuer() -> String {
    "maluum".to_string()
}

fn default_key_id() -> String {
    "maluum-ed25519-1".to_string()
}
