//! HTML extraction collaborator.

use crate::result::AppResult;
use crate::types::document::{AcademicSession, DocumentKind, StructuredDocument};
use crate::types::fetch::FetchJob;

/// Turns fetched portal HTML into structured records.
///
/// The gateway never interprets markup itself; it feeds raw pages in and
/// reports whatever this collaborator returns. Failures should use
/// `ErrorKind::FetchFailed`.
pub trait DocumentExtractor: Send + Sync + std::fmt::Debug + 'static {
    /// Extract the records document for a single session page.
    fn extract(&self, html: &str, job: &FetchJob) -> AppResult<StructuredDocument>;

    /// Extract the session picker entries from a records index page.
    fn extract_sessions(&self, html: &str, kind: DocumentKind) -> AppResult<Vec<AcademicSession>>;
}
