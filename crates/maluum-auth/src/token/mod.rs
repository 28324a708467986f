//! Bearer token claims, minting, and verification.

pub mod claims;
pub mod issuer;
pub mod verifier;

pub use claims::{Claims, TokenPayload};
pub use issuer::{IssuedToken, TokenIssuer};
pub use verifier::TokenVerifier;
