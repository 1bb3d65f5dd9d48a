//! Configuration management

pub mod validation;

pub use validation::{Validate, ValidationError};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub scan: ScanConfig,
    pub whitelist: WhitelistConfig,
    pub report: ReportConfig,
    pub logging: LoggingConfig,
}

/// Scan behaviour configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Number of concurrent workers for per-API resource and authorizer lookups
    pub pool_size: usize,
    /// API name suffixes excluded from auditing
    pub excluded_api_suffixes: Vec<String>,
    /// HTTP methods excluded from classification
    pub excluded_methods: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            pool_size: 30,
            excluded_api_suffixes: vec!["-DEV".to_string(), "-CI".to_string()],
            excluded_methods: vec!["OPTIONS".to_string()],
        }
    }
}

/// Whitelist file locations, one optional file per exemption category
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WhitelistConfig {
    pub no_requiere_seguridad: Option<PathBuf>,
    pub seguridad_en_microservicio: Option<PathBuf>,
    pub seguridad_por_ip: Option<PathBuf>,
}

impl WhitelistConfig {
    /// Configured file location for a whitelist category, if any
    pub fn path_for(&self, category: crate::domain::value_objects::WhitelistCategory) -> Option<&Path> {
        use crate::domain::value_objects::WhitelistCategory;
        match category {
            WhitelistCategory::NoRequiereSeguridad => self.no_requiere_seguridad.as_deref(),
            WhitelistCategory::SeguridadEnMicroservicio => {
                self.seguridad_en_microservicio.as_deref()
            }
            WhitelistCategory::SeguridadPorIp => self.seguridad_por_ip.as_deref(),
        }
    }
}

/// Report output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory where CSV reports are written
    pub output_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("reports"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Validate for Config {
    fn validate(&self) -> Result<(), ValidationError> {
        self.scan.validate()?;
        self.report.validate()?;
        Ok(())
    }
}

impl Validate for ScanConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.pool_size == 0 || self.pool_size > 64 {
            return Err(ValidationError::scan(format!(
                "pool_size must be in range 1-64, got {}",
                self.pool_size
            )));
        }
        Ok(())
    }
}

impl Validate for ReportConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(ValidationError::report(
                "output_dir cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigLoadError> {
        Self::load_from(None)
    }

    /// Load configuration, additionally reading an explicit config file if given
    pub fn load_from(explicit: Option<&Path>) -> Result<Self, ConfigLoadError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false));

        // Add environment-specific config if ENV is set
        if let Ok(env) = std::env::var("ENV") {
            builder = builder
                .add_source(config::File::with_name(&format!("config/{}", env)).required(false));
        }

        builder = builder.add_source(config::File::with_name("config/local").required(false));

        // An explicitly requested file must exist
        if let Some(path) = explicit {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        // Environment variables take highest priority
        builder =
            builder.add_source(config::Environment::with_prefix("GATEWATCH").separator("__"));

        let config: Config = builder.build()?.try_deserialize()?;

        config.validate()?;

        Ok(config)
    }
}

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Configuration file error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Configuration validation error: {0}")]
    Validation(#[from] ValidationError),
}
