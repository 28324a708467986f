//! Liveness policy for cached sessions.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use maluum_core::config::CacheConfig;

/// Decides whether a cached session may be reused without re-login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// Reuse window measured from the acquisition time.
    pub ttl: Duration,
}

impl CachePolicy {
    /// A policy that treats every entry as expired.
    pub fn always_expired() -> Self {
        Self { ttl: Duration::ZERO }
    }

    /// A policy reusing entries for `ttl` after acquisition.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { ttl }
    }

    /// Build from configuration.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::with_ttl(Duration::from_secs(config.session_ttl_seconds))
    }

    /// Whether an entry acquired at `acquired_at` is still live at `now`.
    pub fn is_live(&self, acquired_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        if self.ttl.is_zero() {
            return false;
        }
        let ttl = TimeDelta::from_std(self.ttl).unwrap_or(TimeDelta::MAX);
        match acquired_at.checked_add_signed(ttl) {
            Some(expires_at) => now < expires_at,
            None => true,
        }
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::always_expired()
    }
}
