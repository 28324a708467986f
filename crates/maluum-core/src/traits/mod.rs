//! Core traits defined in `maluum-core` and implemented by other crates.

pub mod authenticator;
pub mod extractor;
pub mod usage;

pub use authenticator::SessionAuthenticator;
pub use extractor::DocumentExtractor;
pub use usage::UsageRecorder;
