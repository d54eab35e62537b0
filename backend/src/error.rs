//! Error types for the telemetry analysis pipeline.
//!
//! - [`AnalysisError`] - Structural failures that abort an analysis
//! - [`MalformedRow`] / [`RowFault`] - Recoverable per-row conditions
//! - [`ConfigError`] - Configuration loading errors
//! - [`PipelineError`] - Top-level orchestration errors
//! - [`ServerError`] - HTTP server errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Row-level conditions
// =============================================================================

/// Why a data row was rejected.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RowFault {
    /// Row has fewer fields than the header.
    #[error("expected {expected} fields, found {found}")]
    ShortRow { expected: usize, found: usize },

    /// A required field is not a number.
    #[error("column '{column}' is not a number (value '{value}')")]
    InvalidNumber { column: String, value: String },

    /// A required field parsed to NaN or infinity.
    #[error("column '{column}' is not finite (value '{value}')")]
    NonFinite { column: String, value: String },
}

/// A data row that was skipped during aggregation.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(rename_all = "camelCase")]
#[error("Row {row} (line {line}): {reason}")]
pub struct MalformedRow {
    /// 0-based index into the table's data rows
    pub row: usize,
    /// 1-based line in the source text
    pub line: usize,
    pub reason: RowFault,
}

// =============================================================================
// Analysis Errors
// =============================================================================

/// Conditions that prevent a summary from being produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// The trimmed input has no header line.
    #[error("Input is empty: no header line found")]
    EmptyInput,

    /// A required logical column is absent from the header.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Header present but no row survived parsing.
    #[error("No valid data rows ({} malformed)", .malformed.len())]
    NoData { malformed: Vec<MalformedRow> },
}

impl AnalysisError {
    /// Stable identifier used by the HTTP API.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::EmptyInput => "emptyInput",
            AnalysisError::MissingColumn(_) => "missingColumn",
            AnalysisError::NoData { .. } => "noData",
        }
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while loading or validating [`crate::config::AnalysisConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("Failed to read config: {0}")]
    IoError(#[from] std::io::Error),

    /// Config file is not valid JSON.
    #[error("Invalid config JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A value is out of range.
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// Returned by [`crate::analysis::pipeline::analyze_file`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Analysis failed.
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Input could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Bind or serve failure.
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
