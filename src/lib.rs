//! Gatewatch - API Gateway authorization auditor
//!
//! Scans every REST API in an account, classifies each endpoint's
//! authorization configuration, and produces CSV compliance reports.
//! Deliberate exemptions are declared in per-category whitelist files.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{Config, LoggingConfig};

/// Initialize the tracing subscriber from logging configuration.
///
/// `RUST_LOG` overrides the configured level when set.
pub fn init_tracing(
    config: &LoggingConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init()?,
        _ => tracing_subscriber::fmt().with_env_filter(filter).try_init()?,
    }

    Ok(())
}
