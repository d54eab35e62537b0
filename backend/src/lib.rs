//! # Mission Control - flight telemetry analysis
//!
//! Turns rocket or drone telemetry CSV logs into a summary of the flight's
//! extremes.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CSV text   │────▶│  Tabulator  │────▶│ Aggregator  │────▶│   Summary   │
//! │ + mode tag  │     │ (RawTable)  │     │ (per mode)  │     │ (or error)  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mission_control::{aggregate, tabulate, FlightMode};
//!
//! let table = tabulate("altitude,velocity,acceleration\n100,50,10\n200,80,5");
//! let result = aggregate(&table, FlightMode::Rocket).unwrap();
//! println!("{:?}", result.summary);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Analysis, config and pipeline error types
//! - [`models`] - Flight modes and summary records
//! - [`parser`] - CSV tabulation and byte decoding
//! - [`analysis`] - Column lookup, aggregation and the pipeline
//! - [`config`] - Constants and tabulator settings
//! - [`api`] - HTTP API server and log streaming

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Analysis
pub mod analysis;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    AnalysisError,
    ConfigError,
    MalformedRow,
    PipelineError,
    RowFault,
    ServerError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    DroneSummary,
    FlightMode,
    FlightSummary,
    ParseModeError,
    RocketSummary,
};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::{AnalysisConfig, STABILITY_BASELINE, STABILITY_WEIGHT, STANDARD_GRAVITY};

// =============================================================================
// Re-exports - Tabulator
// =============================================================================

pub use parser::{
    decode_bytes,
    tabulate,
    tabulate_with,
    Quoting,
    RawRow,
    RawTable,
    TabulateOptions,
};

// =============================================================================
// Re-exports - Analysis
// =============================================================================

pub use analysis::{
    aggregate,
    aggregate_with,
    analyze_bytes,
    analyze_file,
    analyze_text,
    Aggregation,
    AnalysisReport,
    ColumnIndex,
    TableInfo,
};

// Server
pub mod server {
    pub use crate::api::server::{router, start_server};
}
