//! Error types for sl-core

use thiserror::Error;

/// Core error type for schemalint
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config {path}: {message}")]
    ConfigParseError { path: String, message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Facts export could not be read
    #[error("[E004] Cannot read facts file {path}: {message}")]
    FactsRead { path: String, message: String },

    /// E005: Facts export is not valid JSON for the syntax model
    #[error("[E005] Malformed facts file {path}: {message}")]
    FactsParse { path: String, message: String },

    /// E006: Change list could not be read or parsed
    #[error("[E006] Invalid change list {path}: {message}")]
    ChangeListInvalid { path: String, message: String },

    /// E007: IO error
    #[error("[E007] IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
