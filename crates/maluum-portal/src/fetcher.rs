//! Records page fetching with an existing portal session.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header;
use tracing::debug;
use uuid::Uuid;

use maluum_core::config::PortalConfig;
use maluum_core::error::AppError;
use maluum_core::result::AppResult;
use maluum_core::traits::DocumentExtractor;
use maluum_core::types::{DocumentKind, FetchJob, StructuredDocument};
use maluum_worker::FetchHandler;

use crate::client;

/// Fetches schedule and result pages and hands them to the extractor.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    /// Cookie-less client; each request carries its own session cookie.
    client: Client,
    config: PortalConfig,
    extractor: Arc<dyn DocumentExtractor>,
}

impl PageFetcher {
    /// Create a fetcher for the configured portal.
    pub fn new(config: PortalConfig, extractor: Arc<dyn DocumentExtractor>) -> AppResult<Self> {
        Ok(Self {
            client: client::build_client(&config, None)?,
            config,
            extractor,
        })
    }

    /// The extraction collaborator.
    pub fn extractor(&self) -> &Arc<dyn DocumentExtractor> {
        &self.extractor
    }

    /// Base URL of the records page for `kind`.
    pub fn page_url(&self, kind: DocumentKind) -> &str {
        match kind {
            DocumentKind::Schedule => &self.config.schedule_url,
            DocumentKind::Result => &self.config.result_url,
        }
    }

    /// Fetch one records page as HTML.
    ///
    /// Each request presents a fresh random user agent.
    pub async fn fetch_page(
        &self,
        kind: DocumentKind,
        session_token: &str,
        query: &str,
    ) -> AppResult<String> {
        let url = format!("{}{}", self.page_url(kind), query);
        let cookie = client::session_cookie(&self.config.session_cookie_name, session_token)?;

        let response = self
            .client
            .get(&url)
            .header(header::COOKIE, cookie)
            .header(header::USER_AGENT, Uuid::new_v4().to_string())
            .send()
            .await
            .map_err(|e| {
                AppError::fetch_failed(format!("Failed to fetch {kind} page '{query}': {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::fetch_failed(format!(
                "Portal returned {status} for {kind} page '{query}'"
            )));
        }

        response.text().await.map_err(|e| {
            AppError::fetch_failed(format!("Failed to read {kind} page '{query}': {e}"))
        })
    }
}

#[async_trait]
impl FetchHandler for PageFetcher {
    async fn execute(&self, job: &FetchJob) -> AppResult<StructuredDocument> {
        let html = self
            .fetch_page(job.kind, &job.session_token, &job.query)
            .await?;
        debug!(
            kind = %job.kind,
            session = %job.display_name,
            bytes = html.len(),
            "Fetched records page"
        );
        self.extractor.extract(&html, job)
    }
}
