//! Shared configuration and reference data for trendscout.

pub mod app_config;
pub mod config;
pub mod registry;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use registry::{
    load_registry, parse_registry, Category, CategoryRule, ControversyLexicon, Registry, Thresholds,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read registry file {path}: {source}")]
    RegistryFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse registry file: {0}")]
    RegistryFileParse(#[source] serde_yaml::Error),

    #[error("registry validation failed: {0}")]
    Validation(String),
}
