//! Data models for anonymity evaluation results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Dataset;

use super::dimension::DimensionRecord;
use super::entropy::EntropyBounds;

/// One de-identification attempt supplied by the caller.
#[derive(Debug, Clone)]
pub struct DeidentificationAttempt {
    /// De-identified snapshot, row-aligned with the original
    pub after: Dataset,
    /// QIDs de-identified so far, cumulative across attempts
    pub deidentified_qids: Vec<String>,
}

impl DeidentificationAttempt {
    /// Creates a new attempt.
    pub fn new<S: Into<String>>(after: Dataset, deidentified_qids: impl IntoIterator<Item = S>) -> Self {
        Self {
            after,
            deidentified_qids: deidentified_qids.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of QIDs this attempt covers.
    pub fn dimension(&self) -> usize {
        self.deidentified_qids.len()
    }
}

/// l-diversity of a single sensitive attribute in one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDiversity {
    /// Sensitive attribute name
    pub attribute: String,
    /// Smallest number of distinct values in any QID group
    pub l_diversity: usize,
}

/// l-diversity of a sensitive attribute before and after an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensitiveDiversity {
    /// Sensitive attribute name
    pub attribute: String,
    /// l-diversity of the original dataset
    pub before: usize,
    /// l-diversity of the de-identified snapshot
    pub after: usize,
}

/// Anonymity of the original dataset, measured once per session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnonymityBaseline {
    /// k-anonymity of the original dataset
    pub k_anonymity: usize,
    /// Worst t-closeness across sensitive attributes
    pub t_closeness: f64,
    /// Per sensitive attribute, in declaration order
    pub l_diversity: Vec<AttributeDiversity>,
    /// NUE of the untouched and of the fully suppressed snapshot
    pub entropy_bounds: EntropyBounds,
}

/// Everything measured for one de-identification attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptMeasurement {
    /// Cumulative QIDs de-identified by this attempt
    pub deidentified_qids: Vec<String>,
    /// Number of de-identified QIDs
    pub dimension: usize,
    /// k-anonymity of the original dataset
    pub k_before: usize,
    /// k-anonymity of the de-identified snapshot
    pub k_after: usize,
    /// t-closeness of the original dataset
    pub t_before: f64,
    /// t-closeness of the de-identified snapshot
    pub t_after: f64,
    /// Per sensitive attribute, in declaration order
    pub l_diversity: Vec<SensitiveDiversity>,
    /// `k_after − k_before`
    pub privacy_gain: i64,
    /// Raw non-uniform entropy against the original
    pub nue: f64,
    /// NUE normalized into the session's entropy bounds
    pub nue_percentage: f64,
    /// Utility retained, `100 − nue_percentage`
    pub inverse_nue_percentage: f64,
}

impl AttemptMeasurement {
    /// Reduces this measurement to its dimension-selection record.
    pub fn record(&self) -> DimensionRecord {
        DimensionRecord {
            privacy_gain: self.privacy_gain,
            inverse_nue: self.inverse_nue_percentage,
            k_after: self.k_after,
            dimension: self.dimension,
        }
    }
}

/// Final result of an evaluation session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationOutcome {
    /// Original dataset name
    pub dataset_name: String,
    /// Declared QIDs, highest risk first
    pub quasi_identifiers: Vec<String>,
    /// Declared sensitive attributes
    pub sensitive_attributes: Vec<String>,
    /// Anonymity of the original dataset
    pub baseline: AnonymityBaseline,
    /// Measurements in attempt order
    pub measurements: Vec<AttemptMeasurement>,
    /// Selected number of QIDs to de-identify
    pub optimal_dimension: usize,
    /// The first `optimal_dimension` declared QIDs
    pub recommended_qids: Vec<String>,
    /// Timestamp when evaluation finished
    pub evaluated_at: DateTime<Utc>,
}

impl EvaluationOutcome {
    /// Human-readable recommendation.
    pub fn advice(&self) -> String {
        format!(
            "You should de-identify the first {} QIDs: {}",
            self.optimal_dimension,
            self.recommended_qids.join(", ")
        )
    }
}
