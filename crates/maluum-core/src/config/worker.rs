//! Fetch worker pool configuration.

use serde::{Deserialize, Serialize};

/// Concurrent fetch pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Number of concurrent fetch workers.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

fn default_concurrency() -> usize {
    5
}
