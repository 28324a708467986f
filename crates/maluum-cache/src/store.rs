//! Per-user portal session cache with coalesced refresh.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};

use maluum_core::config::CacheConfig;
use maluum_core::error::AppError;
use maluum_core::result::AppResult;

use crate::flight::FlightGroup;
use crate::policy::CachePolicy;

/// A cached portal session for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// The portal session cookie value.
    pub session_token: String,
    /// When the session was obtained.
    pub acquired_at: DateTime<Utc>,
}

/// Session cache keyed by username.
///
/// Concurrent requests for the same user while a refresh is in flight wait
/// for that single refresh instead of starting their own.
#[derive(Debug, Clone)]
pub struct SessionCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
    flights: Arc<FlightGroup<String>>,
    policy: CachePolicy,
}

impl SessionCache {
    /// Create a cache with the given liveness policy.
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            flights: Arc::new(FlightGroup::new()),
            policy,
        }
    }

    /// Create a cache from configuration.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(CachePolicy::from_config(config))
    }

    /// The active liveness policy.
    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    /// Return a live session token for `username`, refreshing it if needed.
    ///
    /// `refresh` produces a new token and its acquisition time. It runs at
    /// most once per user among concurrent callers; every waiter receives
    /// the same token or the same `RefreshFailed` error. A failed refresh
    /// leaves the previous entry untouched.
    pub async fn get_session<F, Fut>(&self, username: &str, refresh: F) -> AppResult<String>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = AppResult<(String, DateTime<Utc>)>> + Send + 'static,
    {
        if let Some(token) = self.live_token(username).await {
            debug!(username, "Session cache hit");
            return Ok(token);
        }

        let entries = Arc::clone(&self.entries);
        let policy = self.policy;
        let key = username.to_string();

        let (result, shared) = self
            .flights
            .run(username, move || async move {
                // Another flight may have finished between the fast-path
                // check and this flight starting.
                if let Some(entry) = entries.read().await.get(&key)
                    && policy.is_live(entry.acquired_at, Utc::now())
                {
                    return Ok(entry.session_token.clone());
                }

                let (session_token, acquired_at) =
                    refresh().await.map_err(AppError::refresh_failed)?;

                entries.write().await.insert(
                    key.clone(),
                    CacheEntry {
                        session_token: session_token.clone(),
                        acquired_at,
                    },
                );
                info!(username = %key, "Portal session refreshed");
                Ok(session_token)
            })
            .await;

        if shared {
            debug!(username, "Shared refresh result with in-flight caller");
        }
        result
    }

    /// Current entry for `username`, live or not.
    pub async fn peek(&self, username: &str) -> Option<CacheEntry> {
        self.entries.read().await.get(username).cloned()
    }

    /// Drop the entry for `username`. Returns whether one existed.
    pub async fn invalidate(&self, username: &str) -> bool {
        self.entries.write().await.remove(username).is_some()
    }

    /// Number of cached entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    async fn live_token(&self, username: &str) -> Option<String> {
        let entries = self.entries.read().await;
        entries
            .get(username)
            .filter(|entry| self.policy.is_live(entry.acquired_at, Utc::now()))
            .map(|entry| entry.session_token.clone())
    }
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::new(CachePolicy::default())
    }
}
