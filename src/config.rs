//! Engine configuration.
//!
//! Monthly caps, week numbering and the tie-break tolerance are read from
//! TOML so a deployment can tighten rules without code changes.
//!
//! ```
//! use duty_roster::config::{EngineConfig, WeekNumbering};
//!
//! let config = EngineConfig::from_toml_str(r#"
//!     overlap_general_cap = 1
//!     max_cardio_weeks = 2
//!     max_late_for_non_overlap = 4
//!     week_numbering = "calendar"
//! "#).unwrap();
//!
//! assert_eq!(config.max_late_for_non_overlap, Some(4));
//! assert_eq!(config.week_numbering, WeekNumbering::Calendar);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// How days of a month are grouped into numbered weeks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekNumbering {
    /// Days 1-7 are week 1, days 8-14 week 2, and so on.
    #[default]
    MonthRelative,
    /// Monday-started calendar rows of the month grid. Week 1 runs from the
    /// 1st up to the first Sunday.
    Calendar,
}

/// Named fairness strengths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FairnessStrength {
    Soft,
    #[default]
    Normal,
    Strong,
}

impl FairnessStrength {
    /// Weight applied to the historical deficit in candidate scores.
    pub fn alpha(self) -> f64 {
        match self {
            FairnessStrength::Soft => 0.4,
            FairnessStrength::Normal => 0.8,
            FairnessStrength::Strong => 1.2,
        }
    }
}

/// Rule constants used by the generator and the roster validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct EngineConfig {
    /// Combined sleep-in + late duties an overlap doctor may take per month.
    pub overlap_general_cap: u32,
    /// Cardiology weeks one doctor may hold per month.
    pub max_cardio_weeks: u32,
    /// Optional cap on late duties for doctors outside the cardiology pool.
    pub max_late_for_non_overlap: Option<u32>,
    /// Optional cap on combined general duties for any doctor.
    pub max_general_for_anyone: Option<u32>,
    /// Week grouping for cardiology blocks and the first-two-weeks rule.
    pub week_numbering: WeekNumbering,
    /// Scores closer than this are considered tied.
    pub tie_epsilon: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            overlap_general_cap: 1,
            max_cardio_weeks: 2,
            max_late_for_non_overlap: None,
            max_general_for_anyone: None,
            week_numbering: WeekNumbering::MonthRelative,
            tie_epsilon: 1e-9,
        }
    }
}

impl EngineConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes to TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tie_epsilon.is_finite() || self.tie_epsilon < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "tie_epsilon must be a finite value >= 0, got {}",
                self.tie_epsilon
            )));
        }
        if self.max_cardio_weeks == 0 {
            return Err(ConfigError::Invalid(
                "max_cardio_weeks must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_overlap_general_cap(mut self, cap: u32) -> Self {
        self.overlap_general_cap = cap;
        self
    }

    pub fn with_max_cardio_weeks(mut self, max: u32) -> Self {
        self.max_cardio_weeks = max;
        self
    }

    /// Enables the stricter late cap for non-overlap doctors.
    pub fn with_max_late_for_non_overlap(mut self, cap: u32) -> Self {
        self.max_late_for_non_overlap = Some(cap);
        self
    }

    /// Enables the stricter combined general-duty cap.
    pub fn with_max_general_for_anyone(mut self, cap: u32) -> Self {
        self.max_general_for_anyone = Some(cap);
        self
    }

    pub fn with_week_numbering(mut self, numbering: WeekNumbering) -> Self {
        self.week_numbering = numbering;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.overlap_general_cap, 1);
        assert_eq!(config.max_cardio_weeks, 2);
        assert!(config.max_late_for_non_overlap.is_none());
        assert!(config.max_general_for_anyone.is_none());
        assert_eq!(config.week_numbering, WeekNumbering::MonthRelative);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str("max_cardio_weeks = 3").unwrap();
        assert_eq!(config.max_cardio_weeks, 3);
        assert_eq!(config.overlap_general_cap, 1);
    }

    #[test]
    fn test_zero_cardio_weeks_rejected() {
        let err = EngineConfig::from_toml_str("max_cardio_weeks = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_bad_toml() {
        let err = EngineConfig::from_toml_str("max_cardio_weeks = \"two\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::load("/nonexistent/roster.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_strength_presets() {
        assert!((FairnessStrength::Soft.alpha() - 0.4).abs() < 1e-12);
        assert!((FairnessStrength::Normal.alpha() - 0.8).abs() < 1e-12);
        assert!((FairnessStrength::Strong.alpha() - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_toml_roundtrip_of_strict_config() {
        let config = EngineConfig::new()
            .with_max_late_for_non_overlap(3)
            .with_max_general_for_anyone(6);
        let text = config.to_toml_string().unwrap();
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
    }
}
