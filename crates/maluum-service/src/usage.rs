//! Fire-and-forget usage analytics.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio_util::task::TaskTracker;
use tracing::{info, warn};

use maluum_core::result::AppResult;
use maluum_core::traits::UsageRecorder;

/// Recorder that only emits a log event.
#[derive(Debug, Default, Clone)]
pub struct TracingUsageRecorder;

#[async_trait]
impl UsageRecorder for TracingUsageRecorder {
    async fn record(&self, username: &str) -> AppResult<()> {
        info!(username, "Usage recorded");
        Ok(())
    }
}

/// Runs usage writes on detached tasks so callers never wait on them.
#[derive(Debug, Clone)]
pub struct UsageTracker {
    recorder: Arc<dyn UsageRecorder>,
    tasks: TaskTracker,
    /// Writes that returned an error.
    failures: Arc<AtomicU64>,
}

impl UsageTracker {
    /// Create a tracker writing to `recorder`.
    pub fn new(recorder: Arc<dyn UsageRecorder>) -> Self {
        Self {
            recorder,
            tasks: TaskTracker::new(),
            failures: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Schedule a usage write for `username` and return immediately.
    pub fn record(&self, username: &str) {
        let recorder = Arc::clone(&self.recorder);
        let failures = Arc::clone(&self.failures);
        let username = username.to_string();

        self.tasks.spawn(async move {
            if let Err(e) = recorder.record(&username).await {
                failures.fetch_add(1, Ordering::Relaxed);
                warn!(username = %username, error = %e, "Failed to record usage");
            }
        });
    }

    /// Wait for every scheduled write to finish.
    pub async fn flush(&self) {
        self.tasks.close();
        self.tasks.wait().await;
        self.tasks.reopen();
    }

    /// Writes still running.
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Writes that have failed so far.
    pub fn failure_count(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }
}
