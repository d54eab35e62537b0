//! REST API types.
//!
//! Response bodies mirror the mission control panel's `analysisResult`
//! message: the mode, the summary record under `data`, plus metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::analysis::AnalysisReport;
use crate::error::{AnalysisError, MalformedRow};
use crate::models::FlightMode;

/// JSON body for `POST /api/analyze/text`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// Full CSV text
    pub csv: String,
    pub mode: FlightMode,
}

/// Response sent after a successful analysis
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub analysis_id: String,

    /// "complete", or "warning" when rows were skipped
    pub status: String,

    pub mode: FlightMode,

    /// Summary record (camelCase fields)
    pub data: Value,

    pub metadata: AnalysisMetadata,
}

/// Metadata about the analyzed input
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetadata {
    pub analyzed_at: DateTime<Utc>,
    pub encoding: String,
    pub columns: Vec<String>,
    pub row_count: usize,
    pub valid_rows: usize,
    pub skipped_rows: usize,
    pub malformed_rows: Vec<MalformedRow>,
}

impl From<AnalysisReport> for AnalysisResponse {
    fn from(report: AnalysisReport) -> Self {
        // The summary serializes as { mode, data }; only data goes in the body
        let data = serde_json::to_value(report.summary)
            .ok()
            .and_then(|mut v| v.get_mut("data").map(Value::take))
            .unwrap_or(Value::Null);

        let skipped_rows = report.malformed.len();

        AnalysisResponse {
            analysis_id: Uuid::new_v4().to_string(),
            status: if skipped_rows == 0 { "complete" } else { "warning" }.to_string(),
            mode: report.mode,
            data,
            metadata: AnalysisMetadata {
                analyzed_at: Utc::now(),
                encoding: report.table.encoding,
                columns: report.table.headers,
                row_count: report.table.row_count,
                valid_rows: report.valid_rows,
                skipped_rows,
                malformed_rows: report.malformed,
            },
        }
    }
}

/// Error body for a failed analysis.
pub fn analysis_error_response(error: &AnalysisError) -> Value {
    let mut body = error_response(error.kind(), &error.to_string());
    if let AnalysisError::NoData { malformed } = error {
        body["malformedRows"] = serde_json::to_value(malformed).unwrap_or(Value::Null);
    }
    body
}

/// Create an error response
pub fn error_response(kind: &str, error: &str) -> Value {
    json!({
        "analysisId": Uuid::new_v4().to_string(),
        "status": "error",
        "errorKind": kind,
        "error": error,
    })
}
