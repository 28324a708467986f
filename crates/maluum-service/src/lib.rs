//! # maluum-service
//!
//! Use-case layer of the Maluum gateway. The [`Gateway`] façade wires the
//! portal authenticator, session cache, token issuer/verifier, and fetch
//! pool together and is what a transport layer calls into.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod extractor;
pub mod gateway;
pub mod records;
pub mod usage;

pub use extractor::RawHtmlExtractor;
pub use gateway::Gateway;
pub use records::RecordsService;
pub use usage::{TracingUsageRecorder, UsageTracker};
