//! Error types for sl-analysis

use thiserror::Error;

/// Analysis error type
///
/// These use the `AE` prefix (Analysis Error) to avoid collisions with
/// diagnostic codes, which use plain `SL` codes (e.g. SL001 for schema field
/// ordering). None of these abort a check: unresolved fields and identifiers
/// are expressed as [`Resolution`](crate::Resolution) values instead.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// AE001: Shared schema helper module could not be loaded
    #[error("[AE001] Failed to load shared schema module at {dir}: {message}")]
    SharedModuleLoad { dir: String, message: String },

    /// AE002: Unknown pass name in a pass filter
    #[error("[AE002] Unknown analysis pass '{name}' (available: {available})")]
    UnknownPass { name: String, available: String },

    /// AE003: Core error propagation
    #[error("[AE003] Core error: {0}")]
    Core(#[from] sl_core::CoreError),
}

/// Result type alias for AnalysisError
pub type AnalysisResult<T> = Result<T, AnalysisError>;
