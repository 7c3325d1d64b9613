//! Error handling module for ClipFlow

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for ClipFlow operations outside the workflow core
#[derive(Error, Debug)]
pub enum ClipFlowError {
    /// Configuration file missing or unreadable
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Configuration value rejected by validation
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Logging could not be set up
    #[error("Failed to initialize logging: {message}")]
    LoggingInit { message: String },

    /// Workflow error surfaced to the host
    #[error(transparent)]
    Workflow(#[from] DomainError),

    /// TOML parse error
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// TOML serialize error
    #[error("Failed to render configuration: {0}")]
    ConfigRender(#[from] toml::ser::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for ClipFlow operations
pub type ClipFlowResult<T> = std::result::Result<T, ClipFlowError>;
