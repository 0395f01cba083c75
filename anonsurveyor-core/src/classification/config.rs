//! Column classifier configuration.
//!
//! Holds the missing-value filter settings and the α/β risk thresholds.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::AnonSurveyorError;

use super::models::RiskCategory;

/// Default missing-value percentage above which a column is dropped.
pub const DEFAULT_MISSING_THRESHOLD_PCT: f64 = 85.0;

/// Decides when the missing-value filter is allowed to drop columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MissingValueGate {
    /// Drop only when the dataset contains a missing value anywhere
    #[default]
    DatasetWide,
    /// Decide per column from its own missing percentage
    PerColumn,
}

/// Validation errors for classifier configuration.
#[derive(Debug, Error)]
pub enum ClassifierConfigError {
    #[error("missing_threshold_pct must be between 0.0 and 100.0, got {0}")]
    InvalidMissingThreshold(f64),
}

impl From<ClassifierConfigError> for AnonSurveyorError {
    fn from(error: ClassifierConfigError) -> Self {
        AnonSurveyorError::invalid_input(error.to_string())
    }
}

/// Column classifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Columns whose missing percentage exceeds this value are dropped
    pub missing_threshold_pct: f64,
    /// Gate applied before dropping columns
    pub missing_gate: MissingValueGate,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            missing_threshold_pct: DEFAULT_MISSING_THRESHOLD_PCT,
            missing_gate: MissingValueGate::DatasetWide,
        }
    }
}

impl ClassifierConfig {
    /// Creates a new classifier config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the missing-value threshold (percent).
    pub fn with_missing_threshold_pct(mut self, threshold: f64) -> Self {
        if !(0.0..=100.0).contains(&threshold) {
            tracing::warn!(
                "missing_threshold_pct {} clamped to valid range [0.0, 100.0]",
                threshold
            );
        }
        self.missing_threshold_pct = threshold.clamp(0.0, 100.0);
        self
    }

    /// Builder method to set the missing-value gate.
    pub fn with_missing_gate(mut self, gate: MissingValueGate) -> Self {
        self.missing_gate = gate;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ClassifierConfigError> {
        if !(0.0..=100.0).contains(&self.missing_threshold_pct) {
            return Err(ClassifierConfigError::InvalidMissingThreshold(
                self.missing_threshold_pct,
            ));
        }
        Ok(())
    }
}

/// α/β thresholds on the risk rate scale (0-100).
///
/// Invariant: both are finite and β ≤ α.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    alpha: f64,
    beta: f64,
}

impl RiskThresholds {
    /// Creates thresholds, failing fast when β > α or either is not finite.
    pub fn new(alpha: f64, beta: f64) -> Result<Self, AnonSurveyorError> {
        if !alpha.is_finite() || !beta.is_finite() || beta > alpha {
            return Err(AnonSurveyorError::InvalidThresholds { alpha, beta });
        }
        Ok(Self { alpha, beta })
    }

    /// Upper threshold; rates above it are sensitive attributes.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Lower threshold; rates below it are non-sensitive.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Buckets a risk rate.
    pub fn categorize(&self, risk_rate: f64) -> RiskCategory {
        if risk_rate > self.alpha {
            RiskCategory::Sensitive
        } else if risk_rate >= self.beta {
            RiskCategory::QuasiIdentifier
        } else {
            RiskCategory::NonSensitive
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifier_config_default() {
        let config = ClassifierConfig::default();
        assert_eq!(config.missing_threshold_pct, 85.0);
        assert_eq!(config.missing_gate, MissingValueGate::DatasetWide);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_classifier_config_builder() {
        let config = ClassifierConfig::new()
            .with_missing_threshold_pct(50.0)
            .with_missing_gate(MissingValueGate::PerColumn);
        assert_eq!(config.missing_threshold_pct, 50.0);
        assert_eq!(config.missing_gate, MissingValueGate::PerColumn);
    }

    #[test]
    fn test_missing_threshold_clamping() {
        let config = ClassifierConfig::new().with_missing_threshold_pct(150.0);
        assert_eq!(config.missing_threshold_pct, 100.0);

        let config = ClassifierConfig::new().with_missing_threshold_pct(-1.0);
        assert_eq!(config.missing_threshold_pct, 0.0);
    }

    #[test]
    fn test_classifier_config_validate_invalid() {
        let config = ClassifierConfig {
            missing_threshold_pct: 120.0,
            ..ClassifierConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ClassifierConfigError::InvalidMissingThreshold(_))
        ));
    }

    #[test]
    fn test_thresholds_reject_inverted() {
        assert!(matches!(
            RiskThresholds::new(20.0, 80.0),
            Err(AnonSurveyorError::InvalidThresholds { .. })
        ));
        assert!(RiskThresholds::new(f64::NAN, 1.0).is_err());
        assert!(RiskThresholds::new(50.0, 50.0).is_ok());
    }

    #[test]
    fn test_thresholds_categorize_boundaries() {
        let thresholds = RiskThresholds::new(80.0, 20.0).unwrap();
        assert_eq!(thresholds.categorize(80.0), RiskCategory::QuasiIdentifier);
        assert_eq!(thresholds.categorize(20.0), RiskCategory::QuasiIdentifier);
        assert_eq!(thresholds.categorize(80.01), RiskCategory::Sensitive);
        assert_eq!(thresholds.categorize(19.99), RiskCategory::NonSensitive);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = ClassifierConfig::new().with_missing_gate(MissingValueGate::PerColumn);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("per_column"));
        let back: ClassifierConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.missing_gate, MissingValueGate::PerColumn);
    }
}
