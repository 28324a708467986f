//! Session cache configuration.

use serde::{Deserialize, Serialize};

/// Liveness window of cached portal sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Seconds a cached session is reused without re-login.
    ///
    /// `0` treats every entry as expired, so the cache only collapses
    /// concurrent refreshes.
    #[serde(default)]
    pub session_ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            session_ttl_seconds: 0,
        }
    }
}
