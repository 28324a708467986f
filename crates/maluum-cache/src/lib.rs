//! # maluum-cache
//!
//! Portal session cache with single-flight refresh. Concurrent requests for
//! the same user collapse into one login; the result is shared by every
//! waiting caller.
//!
//! - [`SessionCache`]: username → `{session_token, acquired_at}` map behind
//!   a read-write lock, with the liveness window from [`CachePolicy`]
//! - [`FlightGroup`]: per-key coalescing of in-flight async work

pub mod flight;
pub mod policy;
pub mod store;

pub use flight::FlightGroup;
pub use policy::CachePolicy;
pub use store::{CacheEntry, SessionCache};
