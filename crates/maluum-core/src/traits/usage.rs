//! Usage analytics sink.

use async_trait::async_trait;

use crate::result::AppResult;

/// Records that a user was served. Called off the request path.
#[async_trait]
pub trait UsageRecorder: Send + Sync + std::fmt::Debug + 'static {
    /// Record one use by `username`.
    async fn record(&self, username: &str) -> AppResult<()>;
}
