//! Anonymity evaluator configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::AnonSurveyorError;

/// Minimum k-anonymity a de-identification attempt must reach to be
/// considered when selecting the optimal dimension.
pub const DEFAULT_MIN_K_ANONYMITY: usize = 2;

/// Grouping used when measuring t-closeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TClosenessMode {
    /// Group by the QIDs only
    #[default]
    Global,
    /// Group by the QIDs plus every other declared sensitive attribute
    Conditional,
}

/// Validation errors for evaluator configuration.
#[derive(Debug, Error)]
pub enum EvaluatorConfigError {
    #[error("min_k_anonymity must be at least 1, got {0}")]
    InvalidMinK(usize),
}

impl From<EvaluatorConfigError> for AnonSurveyorError {
    fn from(error: EvaluatorConfigError) -> Self {
        AnonSurveyorError::invalid_input(error.to_string())
    }
}

/// Anonymity evaluator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// t-closeness grouping mode
    pub t_closeness_mode: TClosenessMode,
    /// Attempts below this k-anonymity are never selected
    pub min_k_anonymity: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            t_closeness_mode: TClosenessMode::Global,
            min_k_anonymity: DEFAULT_MIN_K_ANONYMITY,
        }
    }
}

impl EvaluatorConfig {
    /// Creates a new evaluator config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the t-closeness mode.
    pub fn with_t_closeness_mode(mut self, mode: TClosenessMode) -> Self {
        self.t_closeness_mode = mode;
        self
    }

    /// Builder method to set the minimum acceptable k-anonymity.
    pub fn with_min_k_anonymity(mut self, min_k: usize) -> Self {
        self.min_k_anonymity = min_k;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), EvaluatorConfigError> {
        if self.min_k_anonymity == 0 {
            return Err(EvaluatorConfigError::InvalidMinK(self.min_k_anonymity));
        }
        Ok(())
    }
}
