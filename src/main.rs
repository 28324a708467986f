//! Maluum gateway server.
//!
//! Main entry point that wires all crates together, then runs until a
//! shutdown signal arrives.

use std::sync::Arc;

use maluum_core::config::AppConfig;
use maluum_core::error::AppError;
use maluum_core::logging::init_logging;
use maluum_service::{Gateway, RawHtmlExtractor, TracingUsageRecorder};

#[tokio::main]
async fn main() {
    let env = std::env::var("MALUUM_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(config, &env).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Main server run function
async fn run(config: AppConfig, env: &str) -> Result<(), AppError> {
    tracing::info!(
        "Starting Maluum gateway v{} (env: {})",
        env!("CARGO_PKG_VERSION"),
        env
    );

    let gateway = Gateway::from_config(
        &config,
        Arc::new(RawHtmlExtractor),
        Arc::new(TracingUsageRecorder),
    )?;

    tracing::info!(
        "Gateway ready: portal={}, workers={}, session_ttl={}s",
        config.portal.base_url,
        config.worker.concurrency,
        config.cache.session_ttl_seconds
    );

    tokio::signal::ctrl_c().await?;

    tracing::info!("Shutdown signal received, draining background tasks...");
    gateway.shutdown().await;
    tracing::info!("Shutdown complete");

    Ok(())
}
