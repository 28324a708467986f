//! # maluum-core
//!
//! Core crate for the Maluum gateway. Contains the seam traits (portal
//! authentication, document extraction, usage recording), configuration
//! schemas, shared domain types, logging initialisation, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other Maluum crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind, StatusClass};
pub use result::AppResult;
