//! Error types for option-set configuration loading.

use thiserror::Error;

use crate::ValidationError;

/// Errors that can occur while loading, saving, or checking an
/// [`OptionSetConfig`](crate::OptionSetConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The registered option list failed validation.
    #[error("invalid option set: {0}")]
    InvalidOption(#[from] ValidationError),

    /// A configuration value is unusable (e.g., an empty marker).
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Convenience alias for results with [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;
