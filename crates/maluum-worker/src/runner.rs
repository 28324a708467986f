//! Fetch pool runner. Fans a batch of jobs out over a fixed set of workers.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tracing;

use maluum_core::config::WorkerConfig;
use maluum_core::error::AppError;
use maluum_core::result::AppResult;
use maluum_core::types::{FetchJob, FetchOutcome, StructuredDocument};

use crate::executor::{FetchExecutor, FetchHandler};

/// Bounded worker pool for batches of page fetches
#[derive(Debug, Clone)]
pub struct FetchPool {
    /// Per-job executor shared by all workers
    executor: Arc<FetchExecutor>,
    /// Upper bound on concurrent workers
    concurrency: usize,
}

impl FetchPool {
    /// Create a new pool
    pub fn new(handler: Arc<dyn FetchHandler>, config: &WorkerConfig) -> Self {
        Self {
            executor: Arc::new(FetchExecutor::new(handler)),
            concurrency: config.concurrency.max(1),
        }
    }

    /// Configured worker count
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Run every job and return one outcome per job, in submission order
    pub async fn run_all(&self, jobs: Vec<FetchJob>) -> Vec<FetchOutcome> {
        let total = jobs.len();
        if total == 0 {
            return Vec::new();
        }

        let workers = self.concurrency.min(total);
        tracing::info!("Running {} fetch jobs on {} workers", total, workers);

        // Kept so a job whose worker vanished still gets an outcome.
        let labels: Vec<(String, String)> = jobs
            .iter()
            .map(|job| (job.display_name.clone(), job.query.clone()))
            .collect();

        let (job_tx, job_rx) = mpsc::channel::<(usize, FetchJob)>(total);
        let (result_tx, mut result_rx) = mpsc::channel::<(usize, FetchOutcome)>(total);

        tokio::spawn(async move {
            for (index, job) in jobs.into_iter().enumerate() {
                if job_tx.send((index, job)).await.is_err() {
                    break;
                }
            }
        });

        let job_rx = Arc::new(Mutex::new(job_rx));
        for worker_id in 0..workers {
            let job_rx = Arc::clone(&job_rx);
            let result_tx = result_tx.clone();
            let executor = Arc::clone(&self.executor);

            tokio::spawn(async move {
                loop {
                    let next = job_rx.lock().await.recv().await;
                    let Some((index, job)) = next else {
                        break;
                    };
                    let outcome = executor.execute(&job).await;
                    if result_tx.send((index, outcome)).await.is_err() {
                        break;
                    }
                }
                tracing::trace!("Fetch worker {} drained", worker_id);
            });
        }
        drop(result_tx);

        let mut slots: Vec<Option<FetchOutcome>> = (0..total).map(|_| None).collect();
        let mut received = 0;
        while received < total {
            match result_rx.recv().await {
                Some((index, outcome)) => {
                    slots[index] = Some(outcome);
                    received += 1;
                }
                None => break,
            }
        }

        slots
            .into_iter()
            .zip(labels)
            .map(|(slot, (display_name, query))| {
                slot.unwrap_or_else(|| {
                    tracing::error!("Fetch job '{}' produced no outcome", display_name);
                    FetchOutcome {
                        result: Err(AppError::fetch_failed(format!(
                            "Fetch for '{display_name}' produced no outcome"
                        ))),
                        display_name,
                        query,
                    }
                })
            })
            .collect()
    }

    /// Run every job; fail the whole batch with the first error in
    /// submission order, discarding partial results
    pub async fn run_all_or_fail(&self, jobs: Vec<FetchJob>) -> AppResult<Vec<StructuredDocument>> {
        let outcomes = self.run_all(jobs).await;
        let mut documents = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            documents.push(outcome.result?);
        }
        Ok(documents)
    }
}
