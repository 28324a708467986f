//! Field encryption for bearer token claims.
//!
//! Output layout is `base64(nonce || ciphertext || tag)` with a fresh
//! 96-bit nonce per call.

pub mod key;

use aes_gcm::aead::{Aead, AeadCore, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use maluum_core::error::AppError;
use maluum_core::result::AppResult;

pub use key::{CALLER_KEY_PREFIX, DEFAULT_CALLER_KEY, resolve_caller_key, validate_key_format};

const NONCE_LEN: usize = 12;

/// Encrypt `plaintext` under `key`.
pub fn encrypt(plaintext: &str, key: &str) -> AppResult<String> {
    let cipher = key::derive_cipher(key)?;
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let ciphertext = cipher
        .encrypt(&nonce, plaintext.as_bytes())
        .map_err(|_| AppError::internal("AES-GCM encryption failed"))?;

    let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    sealed.extend_from_slice(nonce.as_slice());
    sealed.extend_from_slice(&ciphertext);
    Ok(STANDARD.encode(sealed))
}

/// Decrypt a value produced by [`encrypt`] with the same `key`.
pub fn decrypt(encoded: &str, key: &str) -> AppResult<String> {
    let sealed = STANDARD
        .decode(encoded.as_bytes())
        .map_err(|_| AppError::decryption_failed("Ciphertext is not valid base64"))?;
    if sealed.len() < NONCE_LEN {
        return Err(AppError::decryption_failed("Ciphertext too short"));
    }

    let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
    let cipher = key::derive_cipher(key)?;
    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| AppError::decryption_failed("Failed to decrypt field"))?;

    String::from_utf8(plaintext)
        .map_err(|_| AppError::decryption_failed("Decrypted field is not UTF-8"))
}
