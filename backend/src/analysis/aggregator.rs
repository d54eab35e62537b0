//! Metric aggregator.
//!
//! Folds a [`RawTable`] into the summary record for a [`FlightMode`]:
//!
//! | Mode   | Columns                          | Derived                                   |
//! |--------|----------------------------------|-------------------------------------------|
//! | Rocket | altitude, velocity, acceleration | max acceleration ÷ standard gravity       |
//! | Drone  | roll, pitch, yaw (absolute)      | baseline − weight × (max roll + max pitch) |
//!
//! Maxima start at zero and only move on a strictly greater value. Rows that
//! are short or hold a non-numeric required field are skipped and reported.

use serde::Serialize;

use super::columns::ColumnIndex;
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, AnalysisResult, MalformedRow, RowFault};
use crate::models::{DroneSummary, FlightMode, FlightSummary, RocketSummary};
use crate::parser::{RawRow, RawTable};

/// Result of aggregating one table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregation {
    pub summary: FlightSummary,
    /// Rows that contributed to the summary
    pub valid_rows: usize,
    /// Rows that were skipped, in source order
    pub malformed: Vec<MalformedRow>,
}

impl Aggregation {
    /// True when no row was skipped
    pub fn is_clean(&self) -> bool {
        self.malformed.is_empty()
    }

    pub fn summary_line(&self) -> String {
        format!(
            "Aggregated: {} valid rows, {} skipped",
            self.valid_rows,
            self.malformed.len()
        )
    }
}

/// Aggregate with the default constants.
pub fn aggregate(table: &RawTable, mode: FlightMode) -> AnalysisResult<Aggregation> {
    aggregate_with(table, mode, &AnalysisConfig::default())
}

/// Aggregate with explicit constants.
pub fn aggregate_with(
    table: &RawTable,
    mode: FlightMode,
    config: &AnalysisConfig,
) -> AnalysisResult<Aggregation> {
    if table.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    let names = mode.required_columns();
    let index = ColumnIndex::from_headers(&table.headers);
    let positions = index.require_all(&names)?;

    let mut peaks = Peaks::default();
    let mut malformed = Vec::new();

    for (row_idx, row) in table.rows.iter().enumerate() {
        match read_row(row, table.headers.len(), &names, &positions) {
            Ok(values) => peaks.observe(values.map(|v| magnitude(mode, v))),
            Err(reason) => malformed.push(MalformedRow {
                row: row_idx,
                line: row.line,
                reason,
            }),
        }
    }

    if peaks.rows == 0 {
        return Err(AnalysisError::NoData { malformed });
    }

    Ok(Aggregation {
        summary: finalize(mode, &peaks.max, config),
        valid_rows: peaks.rows,
        malformed,
    })
}

/// Running maxima plus the number of rows folded in.
#[derive(Debug, Default)]
struct Peaks {
    max: [f64; 3],
    rows: usize,
}

impl Peaks {
    fn observe(&mut self, values: [f64; 3]) {
        for (peak, value) in self.max.iter_mut().zip(values) {
            if value > *peak {
                *peak = value;
            }
        }
        self.rows += 1;
    }
}

fn magnitude(mode: FlightMode, value: f64) -> f64 {
    match mode {
        FlightMode::Rocket => value,
        FlightMode::Drone => value.abs(),
    }
}

fn finalize(mode: FlightMode, max: &[f64; 3], config: &AnalysisConfig) -> FlightSummary {
    match mode {
        FlightMode::Rocket => FlightSummary::Rocket(RocketSummary {
            max_altitude: max[0],
            max_velocity: max[1],
            max_acceleration: max[2] / config.standard_gravity,
        }),
        FlightMode::Drone => FlightSummary::Drone(DroneSummary {
            max_roll: max[0],
            max_pitch: max[1],
            max_yaw: max[2],
            stability_score: config.stability_baseline
                - config.stability_weight * (max[0] + max[1]),
        }),
    }
}

/// Parse the required fields of one row, or say why it can't be used.
fn read_row(
    row: &RawRow,
    expected: usize,
    names: &[&str; 3],
    positions: &[usize; 3],
) -> Result<[f64; 3], RowFault> {
    let short = || RowFault::ShortRow {
        expected,
        found: row.fields.len(),
    };

    if row.fields.len() < expected {
        return Err(short());
    }

    let mut values = [0.0; 3];
    for ((value, name), &pos) in values.iter_mut().zip(names).zip(positions) {
        let raw = row.fields.get(pos).ok_or_else(short)?;
        *value = parse_field(name, raw)?;
    }
    Ok(values)
}

fn parse_field(column: &str, raw: &str) -> Result<f64, RowFault> {
    let value = raw.trim().parse::<f64>().map_err(|_| RowFault::InvalidNumber {
        column: column.to_string(),
        value: raw.to_string(),
    })?;

    if !value.is_finite() {
        return Err(RowFault::NonFinite {
            column: column.to_string(),
            value: raw.to_string(),
        });
    }
    Ok(value)
}
