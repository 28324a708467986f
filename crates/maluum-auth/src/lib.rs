//! # maluum-auth
//!
//! Bearer token handling for the Maluum gateway.
//!
//! ## Modules
//!
//! - `cipher`: caller-key field encryption (AES-256-GCM) and key format checks
//! - `token`: Ed25519-signed token claims, issuing, and verification with
//!   coalesced portal session refresh

pub mod cipher;
pub mod token;

pub use cipher::{DEFAULT_CALLER_KEY, decrypt, encrypt, validate_key_format};
pub use token::{Claims, IssuedToken, TokenIssuer, TokenPayload, TokenVerifier};
