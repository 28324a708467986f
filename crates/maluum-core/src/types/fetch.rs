//! Fetch pool job and outcome types.

use std::fmt;

use crate::error::AppError;
use crate::result::AppResult;
use crate::types::document::{DocumentKind, StructuredDocument};

/// One remote page to fetch with an authenticated session.
#[derive(Clone)]
pub struct FetchJob {
    /// Portal session cookie value.
    pub session_token: String,
    /// Query suffix appended to the records page URL.
    pub query: String,
    /// Session display name carried into the outcome.
    pub display_name: String,
    /// Records page to fetch.
    pub kind: DocumentKind,
}

impl FetchJob {
    /// Create a job.
    pub fn new(
        session_token: impl Into<String>,
        kind: DocumentKind,
        query: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            session_token: session_token.into(),
            query: query.into(),
            display_name: display_name.into(),
            kind,
        }
    }
}

impl fmt::Debug for FetchJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchJob")
            .field("kind", &self.kind)
            .field("query", &self.query)
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}

/// Result of one fetch job. Exactly one is produced per accepted job.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// Display name of the originating job.
    pub display_name: String,
    /// Query suffix of the originating job.
    pub query: String,
    /// Extracted document or the failure.
    pub result: AppResult<StructuredDocument>,
}

impl FetchOutcome {
    /// Successful outcome for `job`.
    pub fn success(job: &FetchJob, document: StructuredDocument) -> Self {
        Self {
            display_name: job.display_name.clone(),
            query: job.query.clone(),
            result: Ok(document),
        }
    }

    /// Failed outcome for `job`.
    pub fn failure(job: &FetchJob, error: AppError) -> Self {
        Self {
            display_name: job.display_name.clone(),
            query: job.query.clone(),
            result: Err(error),
        }
    }

    /// Whether the job succeeded.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}
