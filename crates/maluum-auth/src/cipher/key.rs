//! Caller key handling: format validation and AES key derivation.

use aes_gcm::Aes256Gcm;
use aes_gcm::KeyInit;
use sha2::{Digest, Sha256};

use maluum_core::error::AppError;
use maluum_core::result::AppResult;

/// Key used when the caller supplies none.
pub const DEFAULT_CALLER_KEY: &str = "maluum-default-key";

/// Prefix of provisioned caller keys.
pub const CALLER_KEY_PREFIX: &str = "mlm_";

/// Length of a raw 32-byte key written as hex.
const HEX_KEY_LEN: usize = 64;

/// Check that a caller-supplied key has an accepted shape.
///
/// Accepted: the default key, `mlm_` followed by a non-empty body, or
/// exactly 64 hex characters.
pub fn validate_key_format(key: &str) -> AppResult<()> {
    if key == DEFAULT_CALLER_KEY {
        return Ok(());
    }
    if let Some(body) = key.strip_prefix(CALLER_KEY_PREFIX)
        && !body.is_empty()
    {
        return Ok(());
    }
    if key.len() == HEX_KEY_LEN && key.chars().all(|c| c.is_ascii_hexdigit()) {
        return Ok(());
    }
    Err(AppError::validation("Invalid API key format"))
}

/// Resolve an optional caller key to the key string actually used.
///
/// `None` and the empty string both mean the default key. Supplied keys
/// must pass [`validate_key_format`].
pub fn resolve_caller_key(key: Option<&str>) -> AppResult<&str> {
    match key {
        None | Some("") => Ok(DEFAULT_CALLER_KEY),
        Some(key) => {
            validate_key_format(key)?;
            Ok(key)
        }
    }
}

/// Build the AES-256-GCM cipher for a key string (SHA-256 of the key).
pub(crate) fn derive_cipher(key: &str) -> AppResult<Aes256Gcm> {
    let digest = Sha256::digest(key.as_bytes());
    Aes256Gcm::new_from_slice(&digest)
        .map_err(|e| AppError::internal(format!("Failed to initialise cipher: {e}")))
}
