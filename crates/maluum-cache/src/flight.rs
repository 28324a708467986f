//! Single-flight coalescing of async work keyed by string.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::debug;

use maluum_core::error::AppError;
use maluum_core::result::AppResult;

type SharedFlight<T> = Shared<BoxFuture<'static, AppResult<T>>>;

struct Flight<T: Clone> {
    id: u64,
    future: SharedFlight<T>,
}

/// Collapses concurrent calls for the same key into one execution.
///
/// The first caller for a key starts the work; callers arriving while it is
/// in flight await the same result. Once the work finishes the key is free
/// again, so the next call starts a new execution.
///
/// The work runs on its own task, so it completes and releases the key even
/// when every waiter is dropped.
pub struct FlightGroup<T: Clone> {
    flights: Arc<DashMap<String, Flight<T>>>,
    next_id: AtomicU64,
}

impl<T: Clone> std::fmt::Debug for FlightGroup<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlightGroup")
            .field("in_flight", &self.flights.len())
            .finish()
    }
}

impl<T> FlightGroup<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create an empty group.
    pub fn new() -> Self {
        Self {
            flights: Arc::new(DashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Run `work` for `key`, or join the execution already in flight.
    ///
    /// Returns the result and whether it was shared from another caller's
    /// execution. `work` is only invoked when this caller starts the flight.
    /// A panic inside the work is delivered to every waiter as an internal
    /// error rather than poisoning the key. Must be called within a tokio
    /// runtime.
    pub async fn run<F, Fut>(&self, key: &str, work: F) -> (AppResult<T>, bool)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>> + Send + 'static,
    {
        let (future, joined) = match self.flights.entry(key.to_string()) {
            Entry::Occupied(entry) => (entry.get().future.clone(), true),
            Entry::Vacant(entry) => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                let flights = Arc::clone(&self.flights);
                let owned_key = key.to_string();
                let work = work();

                let task = tokio::spawn(async move {
                    let result = match AssertUnwindSafe(work).catch_unwind().await {
                        Ok(result) => result,
                        Err(_) => Err(AppError::internal(format!(
                            "In-flight work for '{owned_key}' panicked"
                        ))),
                    };
                    flights.remove_if(&owned_key, |_, flight| flight.id == id);
                    result
                });

                let owned_key = key.to_string();
                let future = async move {
                    task.await.unwrap_or_else(|e| {
                        Err(AppError::internal(format!(
                            "In-flight work for '{owned_key}' was aborted: {e}"
                        )))
                    })
                }
                .boxed()
                .shared();

                entry.insert(Flight {
                    id,
                    future: future.clone(),
                });
                (future, false)
            }
        };

        if joined {
            debug!(key, "Joined in-flight execution");
        }

        (future.await, joined)
    }

    /// Number of keys currently in flight.
    pub fn in_flight(&self) -> usize {
        self.flights.len()
    }
}

impl<T> Default for FlightGroup<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
