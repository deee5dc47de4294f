//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while loading a [`MachineConfig`](super::MachineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read config file: {0}")]
    ReadFailed(String),

    /// The configuration text is not valid JSON for this schema
    #[error("Failed to parse config: {0}")]
    ParseFailed(String),

    /// The configuration parsed but holds an unusable value
    #[error("Invalid config: {0}")]
    Invalid(String),
}
