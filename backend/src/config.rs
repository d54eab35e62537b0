//! Analysis configuration.
//!
//! Values are resolved in order: built-in defaults, an optional JSON file,
//! then `MISSION_CONTROL_*` environment variables (a `.env` file is honored).
//!
//! ```json
//! {
//!   "standardGravity": 9.81,
//!   "stabilityBaseline": 100.0,
//!   "stabilityWeight": 0.5,
//!   "delimiter": ",",
//!   "quoting": "rfc4180"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};
use crate::parser::{Quoting, TabulateOptions};

/// Standard gravity in m/s², used to express acceleration in G.
pub const STANDARD_GRAVITY: f64 = 9.81;

/// Stability score of a perfectly level drone flight.
pub const STABILITY_BASELINE: f64 = 100.0;

/// Penalty per degree of combined peak roll and pitch.
pub const STABILITY_WEIGHT: f64 = 0.5;

const ENV_GRAVITY: &str = "MISSION_CONTROL_STANDARD_GRAVITY";
const ENV_BASELINE: &str = "MISSION_CONTROL_STABILITY_BASELINE";
const ENV_WEIGHT: &str = "MISSION_CONTROL_STABILITY_WEIGHT";
const ENV_DELIMITER: &str = "MISSION_CONTROL_DELIMITER";
const ENV_QUOTING: &str = "MISSION_CONTROL_QUOTING";

/// Constants and tabulator settings for one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisConfig {
    /// Divisor converting m/s² to G
    pub standard_gravity: f64,
    pub stability_baseline: f64,
    pub stability_weight: f64,
    /// Field delimiter
    pub delimiter: char,
    pub quoting: Quoting,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            standard_gravity: STANDARD_GRAVITY,
            stability_baseline: STABILITY_BASELINE,
            stability_weight: STABILITY_WEIGHT,
            delimiter: ',',
            quoting: Quoting::default(),
        }
    }
}

impl AnalysisConfig {
    /// Load defaults, then the optional file, then the environment.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let _ = dotenvy::dotenv();

        let mut config = match path {
            Some(p) => Self::from_json_file(p)?,
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file. Missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Override fields from `MISSION_CONTROL_*` variables that are set.
    pub fn apply_env(&mut self) -> ConfigResult<()> {
        self.apply_vars(|key| env::var(key).ok())
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) -> ConfigResult<()> {
        if let Some(v) = var(ENV_GRAVITY) {
            self.standard_gravity = parse_number(ENV_GRAVITY, &v)?;
        }
        if let Some(v) = var(ENV_BASELINE) {
            self.stability_baseline = parse_number(ENV_BASELINE, &v)?;
        }
        if let Some(v) = var(ENV_WEIGHT) {
            self.stability_weight = parse_number(ENV_WEIGHT, &v)?;
        }
        if let Some(v) = var(ENV_DELIMITER) {
            self.delimiter = parse_delimiter(ENV_DELIMITER, &v)?;
        }
        if let Some(v) = var(ENV_QUOTING) {
            self.quoting = v.parse().map_err(|message| ConfigError::InvalidValue {
                field: ENV_QUOTING.to_string(),
                message,
            })?;
        }
        Ok(())
    }

    /// Reject values that would make the summary meaningless.
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.standard_gravity.is_finite() || self.standard_gravity <= 0.0 {
            return Err(invalid("standardGravity", "must be a positive finite number"));
        }
        if !self.stability_baseline.is_finite() {
            return Err(invalid("stabilityBaseline", "must be finite"));
        }
        if !self.stability_weight.is_finite() {
            return Err(invalid("stabilityWeight", "must be finite"));
        }
        if !self.delimiter.is_ascii() || matches!(self.delimiter, '"' | '\n' | '\r') {
            return Err(invalid("delimiter", "must be a single ASCII character other than a quote or newline"));
        }
        Ok(())
    }

    /// Tabulator settings derived from this config.
    ///
    /// Call [`validate`](Self::validate) first; a non-ASCII delimiter falls
    /// back to a comma.
    pub fn tabulate_options(&self) -> TabulateOptions {
        let delimiter = if self.delimiter.is_ascii() { self.delimiter as u8 } else { b',' };
        TabulateOptions {
            delimiter,
            quoting: self.quoting,
        }
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn parse_number(field: &str, raw: &str) -> ConfigResult<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| invalid(field, &format!("'{}' is not a number: {}", raw, e)))
}

fn parse_delimiter(field: &str, raw: &str) -> ConfigResult<char> {
    match raw {
        "\\t" | "tab" | "TAB" => Ok('\t'),
        _ => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(invalid(field, &format!("'{}' is not a single character", raw))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.standard_gravity, 9.81);
        assert_eq!(config.stability_baseline, 100.0);
        assert_eq!(config.stability_weight, 0.5);
        assert_eq!(config.delimiter, ',');
        assert_eq!(config.quoting, Quoting::Rfc4180);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = AnalysisConfig::from_json(r#"{ "standardGravity": 10.0 }"#).unwrap();
        assert_eq!(config.standard_gravity, 10.0);
        assert_eq!(config.stability_weight, 0.5);
    }

    #[test]
    fn test_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "stabilityWeight": 1.0, "quoting": "naive" }}"#).unwrap();

        let config = AnalysisConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.stability_weight, 1.0);
        assert_eq!(config.quoting, Quoting::Naive);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_GRAVITY, "10"),
            (ENV_WEIGHT, "1.5"),
            (ENV_DELIMITER, ";"),
            (ENV_QUOTING, "naive"),
        ]);
        let mut config = AnalysisConfig::default();
        config.apply_vars(|k| vars.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(config.standard_gravity, 10.0);
        assert_eq!(config.stability_weight, 1.5);
        assert_eq!(config.stability_baseline, 100.0);
        assert_eq!(config.delimiter, ';');
        assert_eq!(config.quoting, Quoting::Naive);
        assert_eq!(config.tabulate_options().delimiter, b';');
    }

    #[test]
    fn test_env_rejects_garbage() {
        let mut config = AnalysisConfig::default();
        let result = config.apply_vars(|k| (k == ENV_GRAVITY).then(|| "fast".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_gravity() {
        let config = AnalysisConfig { standard_gravity: 0.0, ..Default::default() };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("standardGravity"));

        let config = AnalysisConfig { standard_gravity: f64::NAN, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_delimiter() {
        let config = AnalysisConfig { delimiter: '"', ..Default::default() };
        assert!(config.validate().is_err());

        let config = AnalysisConfig { delimiter: 'é', ..Default::default() };
        assert!(config.validate().is_err());
        assert_eq!(config.tabulate_options().delimiter, b',');
    }

    #[test]
    fn test_tab_delimiter_alias() {
        assert_eq!(parse_delimiter("x", "\\t").unwrap(), '\t');
        assert!(parse_delimiter("x", ",,").is_err());
    }
}
