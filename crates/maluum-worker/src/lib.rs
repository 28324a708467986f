//! Concurrent page fetching for the Maluum gateway.
//!
//! This crate provides:
//! - A fetch handler trait implemented by the portal page fetcher
//! - An executor that turns every handler result, including panics, into an outcome
//! - A bounded worker pool that runs a batch of jobs and aggregates the outcomes

pub mod executor;
pub mod runner;

pub use executor::{FetchExecutor, FetchHandler};
pub use runner::FetchPool;
