//! Schedule and result retrieval across every academic session.

use std::sync::Arc;

use tracing::{debug, info};

use maluum_core::config::RecordsConfig;
use maluum_core::error::AppError;
use maluum_core::result::AppResult;
use maluum_core::types::{AcademicSession, DocumentKind, FetchJob, StructuredDocument};
use maluum_portal::PageFetcher;
use maluum_worker::FetchPool;

/// Retrieves one records kind for all of a user's sessions.
#[derive(Debug, Clone)]
pub struct RecordsService {
    /// Fetcher for the session index page.
    fetcher: Arc<PageFetcher>,
    /// Pool running one job per session.
    pool: FetchPool,
    /// Placeholder session queries to skip.
    unwanted_queries: Vec<String>,
}

impl RecordsService {
    /// Creates a new records service.
    pub fn new(fetcher: Arc<PageFetcher>, pool: FetchPool, config: &RecordsConfig) -> Self {
        Self {
            fetcher,
            pool,
            unwanted_queries: config.unwanted_session_queries.clone(),
        }
    }

    /// Fetch every session's `kind` records, oldest session first.
    ///
    /// Fails with `NotFound` when the portal lists no real sessions, and
    /// with the first failing session's error when any fetch fails.
    pub async fn retrieve(
        &self,
        session_token: &str,
        kind: DocumentKind,
    ) -> AppResult<Vec<StructuredDocument>> {
        let index = self.fetcher.fetch_page(kind, session_token, "").await?;
        let sessions = self.fetcher.extractor().extract_sessions(&index, kind)?;
        let sessions = self.filter_sessions(sessions);

        if sessions.is_empty() {
            return Err(AppError::not_found(format!("{kind} records are empty")));
        }
        debug!(kind = %kind, sessions = sessions.len(), "Fetching records");

        let jobs = sessions
            .into_iter()
            .map(|session| FetchJob::new(session_token, kind, session.query, session.name))
            .collect();

        let mut documents = self.pool.run_all_or_fail(jobs).await?;
        sort_chronologically(&mut documents);

        info!(kind = %kind, documents = documents.len(), "Records retrieved");
        Ok(documents)
    }

    fn filter_sessions(&self, sessions: Vec<AcademicSession>) -> Vec<AcademicSession> {
        sessions
            .into_iter()
            .filter(|session| !self.unwanted_queries.contains(&session.query))
            .collect()
    }
}

/// Order documents by academic year, then semester.
///
/// Names without a recognisable `YYYY/YYYY` year and semester number go
/// last, keeping their relative order.
pub fn sort_chronologically(documents: &mut [StructuredDocument]) {
    documents.sort_by_key(|document| {
        let key = session_order(&document.session_name);
        (key.is_none(), key)
    });
}

/// `(start year, semester)` parsed from a session name such as
/// `"Sem 1, 2023/2024"`.
pub fn session_order(name: &str) -> Option<(u32, u32)> {
    let year = name
        .split(|c: char| !(c.is_ascii_digit() || c == '/'))
        .find_map(|part| {
            let (start, end) = part.split_once('/')?;
            if start.len() == 4 && end.len() == 4 && end.bytes().all(|b| b.is_ascii_digit()) {
                start.parse().ok()
            } else {
                None
            }
        })?;

    let lower = name.to_ascii_lowercase();
    let after = &lower[lower.find("sem")? + 3..];
    let semester = after
        .trim_start_matches(|c: char| c.is_ascii_alphabetic() || c == ' ' || c == '.')
        .chars()
        .next()?
        .to_digit(10)?;

    Some((year, semester))
}
