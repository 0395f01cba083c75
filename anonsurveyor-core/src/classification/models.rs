//! Column classification result models.
//!
//! Reports carry column names, counts and rates only, never cell values.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::config::RiskThresholds;

/// A column dropped because too many of its values are missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedColumn {
    /// Column name
    pub column_name: String,
    /// Count of missing cells
    pub missing_count: u64,
    /// Missing cells as a percentage of rows (0-100)
    pub missing_percentage: f64,
}

/// Re-identification risk rate of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRisk {
    /// Column name
    pub column_name: String,
    /// Mean inverse-frequency weight × 100, rounded to 2 decimals
    pub risk_rate: f64,
}

impl ColumnRisk {
    /// Creates a new column risk entry.
    pub fn new(column_name: impl Into<String>, risk_rate: f64) -> Self {
        Self {
            column_name: column_name.into(),
            risk_rate,
        }
    }
}

/// Sorts by descending risk rate, ties broken by column name.
pub fn sort_by_risk_desc(risks: &mut [ColumnRisk]) {
    risks.sort_by(|a, b| {
        b.risk_rate
            .partial_cmp(&a.risk_rate)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.column_name.cmp(&b.column_name))
    });
}

/// Bucket assigned to a column by the α/β thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    /// β ≤ risk ≤ α
    QuasiIdentifier,
    /// risk > α
    Sensitive,
    /// risk < β
    NonSensitive,
}

/// Partition of columns into QID, SA and non-sensitive sets.
///
/// Each set is sorted by descending risk rate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnClassification {
    /// Quasi-identifiers
    pub quasi_identifiers: Vec<ColumnRisk>,
    /// Sensitive attributes
    pub sensitive_attributes: Vec<ColumnRisk>,
    /// Non-sensitive columns
    pub non_sensitive: Vec<ColumnRisk>,
}

impl ColumnClassification {
    /// Total number of classified columns.
    pub fn len(&self) -> usize {
        self.quasi_identifiers.len() + self.sensitive_attributes.len() + self.non_sensitive.len()
    }

    /// Returns true if no column was classified.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks up the category of a column.
    pub fn category_of(&self, column_name: &str) -> Option<RiskCategory> {
        let contains =
            |set: &[ColumnRisk]| set.iter().any(|risk| risk.column_name == column_name);

        if contains(&self.quasi_identifiers) {
            Some(RiskCategory::QuasiIdentifier)
        } else if contains(&self.sensitive_attributes) {
            Some(RiskCategory::Sensitive)
        } else if contains(&self.non_sensitive) {
            Some(RiskCategory::NonSensitive)
        } else {
            None
        }
    }

    /// QID names from highest to lowest risk, the order in which they
    /// should be de-identified.
    pub fn deidentification_order(&self) -> Vec<&str> {
        self.quasi_identifiers
            .iter()
            .map(|risk| risk.column_name.as_str())
            .collect()
    }
}

/// Complete result of a classification pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationReport {
    /// Dataset name
    pub dataset_name: String,
    /// Number of rows analyzed
    pub analyzed_rows: u64,
    /// Direct identifiers removed before scoring
    pub pruned_columns: Vec<String>,
    /// Columns dropped for missing values
    pub dropped_columns: Vec<DroppedColumn>,
    /// Risk rates sorted descending
    pub risk_rates: Vec<ColumnRisk>,
    /// Thresholds used for classification, if any
    pub thresholds: Option<RiskThresholds>,
    /// Classification, present once thresholds are supplied
    pub classification: Option<ColumnClassification>,
    /// Timestamp when analysis was performed
    pub analyzed_at: DateTime<Utc>,
}

impl ClassificationReport {
    /// Creates an empty report for a dataset.
    pub fn new(dataset_name: impl Into<String>, analyzed_rows: u64) -> Self {
        Self {
            dataset_name: dataset_name.into(),
            analyzed_rows,
            pruned_columns: Vec::new(),
            dropped_columns: Vec::new(),
            risk_rates: Vec::new(),
            thresholds: None,
            classification: None,
            analyzed_at: Utc::now(),
        }
    }

    /// Sets the pruned direct identifiers.
    pub fn with_pruned_columns(mut self, columns: Vec<String>) -> Self {
        self.pruned_columns = columns;
        self
    }

    /// Sets the columns dropped for missing values.
    pub fn with_dropped_columns(mut self, columns: Vec<DroppedColumn>) -> Self {
        self.dropped_columns = columns;
        self
    }

    /// Sets the risk rates, sorting them descending.
    pub fn with_risk_rates(mut self, mut rates: Vec<ColumnRisk>) -> Self {
        sort_by_risk_desc(&mut rates);
        self.risk_rates = rates;
        self
    }

    /// Sets the thresholds and the resulting classification.
    pub fn with_classification(
        mut self,
        thresholds: RiskThresholds,
        classification: ColumnClassification,
    ) -> Self {
        self.thresholds = Some(thresholds);
        self.classification = Some(classification);
        self
    }

    /// Risk rate of a column, if it was scored.
    pub fn risk_rate(&self, column_name: &str) -> Option<f64> {
        self.risk_rates
            .iter()
            .find(|risk| risk.column_name == column_name)
            .map(|risk| risk.risk_rate)
    }
}
