//! High-level pipeline: decode, tabulate, aggregate, report.
//!
//! # Example
//!
//! ```rust,ignore
//! use mission_control::{analyze_file, AnalysisConfig, FlightMode};
//! use std::path::Path;
//!
//! let config = AnalysisConfig::load(None)?;
//! let report = analyze_file(Path::new("flight.csv"), FlightMode::Rocket, &config)?;
//! println!("{:?}", report.summary);
//! ```

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use super::aggregator::aggregate_with;
use super::columns::ColumnIndex;
use crate::api::logs::{log_error, log_info, log_info_indent, log_success, log_warning, log_warning_indent};
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, AnalysisResult, MalformedRow, PipelineResult};
use crate::models::{FlightMode, FlightSummary};
use crate::parser::{decode_bytes, tabulate_with, RawTable};

/// How many malformed rows are echoed to the log
const LOGGED_ROW_SAMPLE: usize = 5;

/// Information about the tabulated input
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableInfo {
    pub encoding: String,
    pub headers: Vec<String>,
    /// Data rows, excluding the header and blank lines
    pub row_count: usize,
}

/// Result of a complete analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub mode: FlightMode,
    pub summary: FlightSummary,
    pub table: TableInfo,
    pub valid_rows: usize,
    pub malformed: Vec<MalformedRow>,
}

impl AnalysisReport {
    pub fn skipped(&self) -> usize {
        self.malformed.len()
    }
}

/// Analyze a text blob.
pub fn analyze_text(
    text: &str,
    mode: FlightMode,
    config: &AnalysisConfig,
) -> AnalysisResult<AnalysisReport> {
    analyze_decoded(text, "utf-8".to_string(), mode, config)
}

/// Analyze raw bytes, detecting their encoding first.
pub fn analyze_bytes(
    bytes: &[u8],
    mode: FlightMode,
    config: &AnalysisConfig,
) -> AnalysisResult<AnalysisReport> {
    let (text, encoding) = decode_bytes(bytes);
    analyze_decoded(&text, encoding, mode, config)
}

/// Read and analyze a file.
pub fn analyze_file(
    path: &Path,
    mode: FlightMode,
    config: &AnalysisConfig,
) -> PipelineResult<AnalysisReport> {
    log_info(format!("📖 Reading {}...", path.display()));
    let bytes = std::fs::read(path)?;
    Ok(analyze_bytes(&bytes, mode, config)?)
}

fn analyze_decoded(
    text: &str,
    encoding: String,
    mode: FlightMode,
    config: &AnalysisConfig,
) -> AnalysisResult<AnalysisReport> {
    log_info(format!("🛰️  Analyzing {} telemetry ({})", mode, encoding));

    let table = tabulate_with(text, &config.tabulate_options());
    print_table(&table);

    let aggregation = match aggregate_with(&table, mode, config) {
        Ok(a) => a,
        Err(e) => {
            report_failure(&e, &table, mode);
            return Err(e);
        }
    };

    log_success(format!("{} valid rows", aggregation.valid_rows));
    if !aggregation.is_clean() {
        print_malformed(&aggregation.malformed);
    }

    Ok(AnalysisReport {
        mode,
        summary: aggregation.summary,
        table: TableInfo {
            encoding,
            headers: table.headers,
            row_count: table.rows.len(),
        },
        valid_rows: aggregation.valid_rows,
        malformed: aggregation.malformed,
    })
}

fn print_table(table: &RawTable) {
    if table.is_empty() {
        return;
    }
    log_info(format!("📋 {} columns, {} data rows", table.headers.len(), table.row_count()));
    log_info_indent(table.headers.join(", "), 1);
}

fn report_failure(error: &AnalysisError, table: &RawTable, mode: FlightMode) {
    match error {
        AnalysisError::MissingColumn(_) => {
            let missing = ColumnIndex::from_headers(&table.headers)
                .missing(&mode.required_columns());
            log_error(format!("Missing columns for {} mode: {}", mode, missing.join(", ")));
        }
        AnalysisError::NoData { malformed } => {
            log_error(error.to_string());
            print_malformed(malformed);
        }
        AnalysisError::EmptyInput => log_error(error.to_string()),
    }
}

/// Log skipped rows grouped by fault, a few row numbers per group.
fn print_malformed(rows: &[MalformedRow]) {
    log_warning(format!("{} rows skipped", rows.len()));

    let mut reasons: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for row in rows {
        reasons.entry(row.reason.to_string()).or_default().push(row.line);
    }

    for (reason, lines) in reasons.iter().take(LOGGED_ROW_SAMPLE) {
        let sample: Vec<String> = lines.iter().take(LOGGED_ROW_SAMPLE).map(|l| l.to_string()).collect();
        let more = if lines.len() > LOGGED_ROW_SAMPLE {
            format!(" ... +{}", lines.len() - LOGGED_ROW_SAMPLE)
        } else {
            String::new()
        };
        log_warning_indent(format!("• {} (lines: {}{})", reason, sample.join(", "), more), 1);
    }
}
