//! Fetch executor. Runs one job through the handler and always yields an outcome.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use tracing;

use maluum_core::error::AppError;
use maluum_core::result::AppResult;
use maluum_core::types::{FetchJob, FetchOutcome, StructuredDocument};

/// Trait for fetch handler implementations
#[async_trait]
pub trait FetchHandler: Send + Sync + std::fmt::Debug + 'static {
    /// Fetch and extract the page described by `job`
    async fn execute(&self, job: &FetchJob) -> AppResult<StructuredDocument>;
}

/// Wraps a handler so that every job produces exactly one outcome
#[derive(Debug, Clone)]
pub struct FetchExecutor {
    /// The handler doing the actual work
    handler: Arc<dyn FetchHandler>,
}

impl FetchExecutor {
    /// Create a new executor
    pub fn new(handler: Arc<dyn FetchHandler>) -> Self {
        Self { handler }
    }

    /// Execute a job; handler errors and panics become failed outcomes
    pub async fn execute(&self, job: &FetchJob) -> FetchOutcome {
        tracing::debug!(
            "Executing fetch job: kind={}, session='{}'",
            job.kind,
            job.display_name
        );

        match AssertUnwindSafe(self.handler.execute(job)).catch_unwind().await {
            Ok(Ok(document)) => FetchOutcome::success(job, document),
            Ok(Err(err)) => {
                tracing::warn!("Fetch job '{}' failed: {}", job.display_name, err);
                FetchOutcome::failure(job, err)
            }
            Err(panic) => {
                let reason = panic_message(panic.as_ref());
                tracing::error!("Fetch job '{}' panicked: {}", job.display_name, reason);
                FetchOutcome::failure(
                    job,
                    AppError::fetch_failed(format!(
                        "Fetch for '{}' panicked: {reason}",
                        job.display_name
                    )),
                )
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
