//! Telemetry analysis.
//!
//! - `columns`: Header lookup for logical columns
//! - `aggregator`: Fold tabulated rows into a flight summary
//! - `pipeline`: Decode, tabulate, aggregate and report, with logging
//!
//! ## Usage Flow
//!
//! ```text
//! text + mode → parser::tabulate → RawTable → aggregator::aggregate → FlightSummary
//! ```

pub mod aggregator;
pub mod columns;
pub mod pipeline;

pub use aggregator::{aggregate, aggregate_with, Aggregation};
pub use columns::ColumnIndex;
pub use pipeline::{analyze_bytes, analyze_file, analyze_text, AnalysisReport, TableInfo};
