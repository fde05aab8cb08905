use std::path::PathBuf;

use thiserror::Error;

/// Application configuration for the cart engine and its driver binary.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the remote cart service.
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Path of the durable local cart snapshot file.
    pub storage_path: PathBuf,
    pub log_level: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
