//! Shared domain types passed between the gateway crates.

pub mod credentials;
pub mod document;
pub mod fetch;

pub use credentials::{AuthenticatedSession, Credentials};
pub use document::{AcademicSession, DocumentKind, StructuredDocument};
pub use fetch::{FetchJob, FetchOutcome};
