//! # maluum-portal
//!
//! Everything that talks to the upstream student portal:
//!
//! - `client`: HTTP client construction with browser-like headers
//! - `login`: the three-step SSO login and logout
//! - `fetcher`: per-job records page fetching handed to the fetch pool

pub mod client;
pub mod fetcher;
pub mod login;

pub use fetcher::PageFetcher;
pub use login::PortalAuthenticator;
