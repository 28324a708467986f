//! The gateway façade called by the transport layer.

use std::sync::Arc;

use tracing::{info, warn};

use maluum_auth::{IssuedToken, TokenIssuer, TokenPayload, TokenVerifier};
use maluum_cache::SessionCache;
use maluum_core::config::AppConfig;
use maluum_core::error::AppError;
use maluum_core::result::AppResult;
use maluum_core::traits::{DocumentExtractor, SessionAuthenticator, UsageRecorder};
use maluum_core::types::{Credentials, DocumentKind, FetchJob, FetchOutcome, StructuredDocument};
use maluum_portal::{PageFetcher, PortalAuthenticator};
use maluum_worker::FetchPool;

use crate::records::RecordsService;
use crate::usage::UsageTracker;

/// Login, token verification, and records retrieval behind one handle.
#[derive(Debug, Clone)]
pub struct Gateway {
    authenticator: Arc<dyn SessionAuthenticator>,
    cache: Arc<SessionCache>,
    issuer: TokenIssuer,
    verifier: TokenVerifier,
    pool: FetchPool,
    records: RecordsService,
    usage: UsageTracker,
}

impl Gateway {
    /// Build a gateway talking to the configured portal.
    pub fn from_config(
        config: &AppConfig,
        extractor: Arc<dyn DocumentExtractor>,
        recorder: Arc<dyn UsageRecorder>,
    ) -> AppResult<Self> {
        let authenticator = Arc::new(PortalAuthenticator::new(config.portal.clone())?);
        let fetcher = Arc::new(PageFetcher::new(config.portal.clone(), extractor)?);
        Self::new(config, authenticator, fetcher, recorder)
    }

    /// Build a gateway from explicit collaborators.
    pub fn new(
        config: &AppConfig,
        authenticator: Arc<dyn SessionAuthenticator>,
        fetcher: Arc<PageFetcher>,
        recorder: Arc<dyn UsageRecorder>,
    ) -> AppResult<Self> {
        let cache = Arc::new(SessionCache::from_config(&config.cache));
        let issuer = TokenIssuer::new(&config.auth)?;
        let verifier =
            TokenVerifier::new(&config.auth, Arc::clone(&cache), Arc::clone(&authenticator))?;
        let pool = FetchPool::new(fetcher.clone(), &config.worker);
        let records = RecordsService::new(fetcher, pool.clone(), &config.records);

        Ok(Self {
            authenticator,
            cache,
            issuer,
            verifier,
            pool,
            records,
            usage: UsageTracker::new(recorder),
        })
    }

    /// Log in to the portal and mint a bearer token.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        caller_key: Option<&str>,
    ) -> AppResult<IssuedToken> {
        if username.is_empty() || password.is_empty() {
            return Err(AppError::validation("Username and password are required"));
        }
        if let Some(key) = caller_key.filter(|key| !key.is_empty()) {
            maluum_auth::validate_key_format(key)?;
        }

        let session = self
            .authenticator
            .login(&Credentials::new(username, password))
            .await?;
        let issued = self
            .issuer
            .issue(&session.session_token, &session.credentials, caller_key)?;

        info!(username, "User logged in");
        Ok(issued)
    }

    /// Verify a bearer token, revalidating the portal session when the
    /// token has expired.
    pub async fn verify_and_refresh(
        &self,
        token: &str,
        caller_key: Option<&str>,
    ) -> AppResult<TokenPayload> {
        let payload = self.verifier.verify(token, caller_key).await?;
        self.usage.record(&payload.username);
        Ok(payload)
    }

    /// Mint a fresh token for an already verified payload.
    pub fn reissue(
        &self,
        payload: &TokenPayload,
        caller_key: Option<&str>,
    ) -> AppResult<IssuedToken> {
        let credentials = Credentials::new(payload.username.clone(), payload.password.clone());
        self.issuer
            .issue(&payload.session_token, &credentials, caller_key)
    }

    /// Run `jobs` against the portal with `session_token`.
    ///
    /// Returns one outcome per job in submission order; individual failures
    /// are reported in the outcomes.
    pub async fn fetch_many(
        &self,
        session_token: &str,
        jobs: Vec<FetchJob>,
    ) -> AppResult<Vec<FetchOutcome>> {
        if session_token.is_empty() {
            return Err(AppError::validation("Session token is required"));
        }
        let jobs = jobs
            .into_iter()
            .map(|job| FetchJob {
                session_token: session_token.to_string(),
                ..job
            })
            .collect();
        Ok(self.pool.run_all(jobs).await)
    }

    /// Class schedules for every session, oldest first.
    pub async fn schedules(&self, session_token: &str) -> AppResult<Vec<StructuredDocument>> {
        self.records
            .retrieve(session_token, DocumentKind::Schedule)
            .await
    }

    /// Examination results for every session, oldest first.
    pub async fn results(&self, session_token: &str) -> AppResult<Vec<StructuredDocument>> {
        self.records.retrieve(session_token, DocumentKind::Result).await
    }

    /// End the user's portal session and forget the cached one.
    pub async fn logout(&self, payload: &TokenPayload) -> AppResult<()> {
        let dropped = self.cache.invalidate(&payload.username).await;
        self.authenticator
            .logout(&payload.session_token)
            .await
            .inspect_err(|e| {
                warn!(username = %payload.username, error = %e, "Portal logout failed");
            })?;

        info!(username = %payload.username, dropped, "User logged out");
        Ok(())
    }

    /// The session cache shared with the verifier.
    pub fn cache(&self) -> &Arc<SessionCache> {
        &self.cache
    }

    /// The background usage tracker.
    pub fn usage(&self) -> &UsageTracker {
        &self.usage
    }

    /// Drain background work before the process exits.
    pub async fn shutdown(&self) {
        self.usage.flush().await;
    }
}
