//! Fallback extractor used when no HTML parser is wired in.

use serde_json::json;

use maluum_core::error::AppError;
use maluum_core::result::AppResult;
use maluum_core::traits::DocumentExtractor;
use maluum_core::types::{AcademicSession, DocumentKind, FetchJob, StructuredDocument};

/// Wraps each fetched page verbatim and cannot list sessions.
#[derive(Debug, Default, Clone)]
pub struct RawHtmlExtractor;

impl DocumentExtractor for RawHtmlExtractor {
    fn extract(&self, html: &str, job: &FetchJob) -> AppResult<StructuredDocument> {
        Ok(StructuredDocument {
            kind: job.kind,
            session_name: job.display_name.clone(),
            session_query: job.query.clone(),
            body: json!({ "html": html }),
        })
    }

    fn extract_sessions(&self, _html: &str, kind: DocumentKind) -> AppResult<Vec<AcademicSession>> {
        Err(AppError::fetch_failed(format!(
            "No extractor configured for the {kind} session list"
        )))
    }
}
