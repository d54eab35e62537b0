//! Domain models for flight telemetry analysis.
//!
//! - [`FlightMode`] - Rocket or drone; selects columns and summary shape
//! - [`RocketSummary`] - Peak altitude, velocity and acceleration
//! - [`DroneSummary`] - Peak roll, pitch, yaw and stability score
//! - [`FlightSummary`] - Either of the above, tagged with its mode

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// Flight Mode
// =============================================================================

/// Category of flight being analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum FlightMode {
    Rocket,
    Drone,
}

impl FlightMode {
    /// All modes, in display order.
    pub const ALL: [FlightMode; 2] = [FlightMode::Rocket, FlightMode::Drone];

    /// Logical columns that must be present in the header.
    pub fn required_columns(&self) -> [&'static str; 3] {
        match self {
            FlightMode::Rocket => ["altitude", "velocity", "acceleration"],
            FlightMode::Drone => ["roll", "pitch", "yaw"],
        }
    }

    /// Literal used on the wire and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightMode::Rocket => "rocket",
            FlightMode::Drone => "drone",
        }
    }
}

impl fmt::Display for FlightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Unknown flight mode literal.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Unknown flight mode '{0}' (expected 'rocket' or 'drone')")]
pub struct ParseModeError(pub String);

impl FromStr for FlightMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rocket" => Ok(FlightMode::Rocket),
            "drone" => Ok(FlightMode::Drone),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

impl TryFrom<String> for FlightMode {
    type Error = ParseModeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// =============================================================================
// Summaries
// =============================================================================

/// Rocket flight extremes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RocketSummary {
    /// Meters
    pub max_altitude: f64,
    /// Meters per second
    pub max_velocity: f64,
    /// Multiples of standard gravity
    pub max_acceleration: f64,
}

/// Drone flight extremes. Angles are absolute degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DroneSummary {
    pub max_roll: f64,
    pub max_pitch: f64,
    pub max_yaw: f64,
    /// Nominally at most 100; not clamped.
    pub stability_score: f64,
}

/// Summary record for one analysis, tagged with its mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "data", rename_all = "lowercase")]
pub enum FlightSummary {
    Rocket(RocketSummary),
    Drone(DroneSummary),
}

impl FlightSummary {
    pub fn mode(&self) -> FlightMode {
        match self {
            FlightSummary::Rocket(_) => FlightMode::Rocket,
            FlightSummary::Drone(_) => FlightMode::Drone,
        }
    }

    pub fn as_rocket(&self) -> Option<&RocketSummary> {
        match self {
            FlightSummary::Rocket(s) => Some(s),
            FlightSummary::Drone(_) => None,
        }
    }

    pub fn as_drone(&self) -> Option<&DroneSummary> {
        match self {
            FlightSummary::Drone(s) => Some(s),
            FlightSummary::Rocket(_) => None,
        }
    }

    /// Summary card lines, as shown by the mission control panel.
    pub fn display_lines(&self) -> Vec<String> {
        match self {
            FlightSummary::Rocket(s) => vec![
                "Rocket Flight Summary".to_string(),
                format!("Max Altitude: {:.2} m", s.max_altitude),
                format!("Max Velocity: {:.2} m/s", s.max_velocity),
                format!("Max Acceleration: {:.2} G", s.max_acceleration),
            ],
            FlightSummary::Drone(s) => vec![
                "Drone Flight Summary".to_string(),
                format!("Max Roll: {:.2} degrees", s.max_roll),
                format!("Max Pitch: {:.2} degrees", s.max_pitch),
                format!("Max Yaw: {:.2} degrees", s.max_yaw),
                format!("Stability Score: {:.1}", s.stability_score),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("rocket".parse::<FlightMode>().unwrap(), FlightMode::Rocket);
        assert_eq!(" Drone ".parse::<FlightMode>().unwrap(), FlightMode::Drone);
        assert!("plane".parse::<FlightMode>().is_err());
    }

    #[test]
    fn test_mode_deserialization_is_lenient() {
        let mode: FlightMode = serde_json::from_str(r#"" Drone ""#).unwrap();
        assert_eq!(mode, FlightMode::Drone);
        assert!(serde_json::from_str::<FlightMode>(r#""plane""#).is_err());
        assert_eq!(serde_json::to_value(FlightMode::Rocket).unwrap(), json!("rocket"));
    }

    #[test]
    fn test_required_columns() {
        assert_eq!(
            FlightMode::Rocket.required_columns(),
            ["altitude", "velocity", "acceleration"]
        );
        assert_eq!(FlightMode::Drone.required_columns(), ["roll", "pitch", "yaw"]);
    }

    #[test]
    fn test_summary_serialization() {
        let summary = FlightSummary::Rocket(RocketSummary {
            max_altitude: 200.0,
            max_velocity: 80.0,
            max_acceleration: 2.0,
        });
        let value = serde_json::to_value(summary).unwrap();
        assert_eq!(
            value,
            json!({
                "mode": "rocket",
                "data": { "maxAltitude": 200.0, "maxVelocity": 80.0, "maxAcceleration": 2.0 }
            })
        );
    }

    #[test]
    fn test_display_lines() {
        let summary = FlightSummary::Drone(DroneSummary {
            max_roll: 10.0,
            max_pitch: 12.0,
            max_yaw: 2.0,
            stability_score: 89.0,
        });
        let lines = summary.display_lines();
        assert_eq!(lines[1], "Max Roll: 10.00 degrees");
        assert_eq!(lines[4], "Stability Score: 89.0");
        assert_eq!(summary.mode(), FlightMode::Drone);
        assert!(summary.as_rocket().is_none());
    }
}
