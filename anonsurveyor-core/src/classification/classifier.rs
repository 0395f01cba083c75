//! Column classifier facade.
//!
//! This module provides the `ColumnClassifier` that runs the full scoring
//! pipeline (pruning, missing-value filtering, distinctness weighting, risk
//! rates) and buckets columns by the α/β thresholds.

use std::collections::BTreeMap;

use crate::error::{AnonSurveyorError, Result};
use crate::models::Dataset;

use super::config::{ClassifierConfig, RiskThresholds};
use super::distinctness::{compute_distinct_weights, compute_risk_rates};
use super::missing::filter_columns_na;
use super::models::{
    ClassificationReport, ColumnClassification, ColumnRisk, RiskCategory, sort_by_risk_desc,
};

/// Partitions columns by risk rate.
///
/// risk ∈ [β, α] → QID, risk > α → SA, risk < β → non-sensitive. Fails
/// fast when β > α.
pub fn classify_columns(
    risk_rates: &BTreeMap<String, f64>,
    beta: f64,
    alpha: f64,
) -> Result<ColumnClassification> {
    let thresholds = RiskThresholds::new(alpha, beta)?;
    Ok(classify_with(
        risk_rates
            .iter()
            .map(|(name, rate)| ColumnRisk::new(name.as_str(), *rate)),
        &thresholds,
    ))
}

fn classify_with(
    risks: impl IntoIterator<Item = ColumnRisk>,
    thresholds: &RiskThresholds,
) -> ColumnClassification {
    let mut classification = ColumnClassification::default();

    for risk in risks {
        match thresholds.categorize(risk.risk_rate) {
            RiskCategory::QuasiIdentifier => classification.quasi_identifiers.push(risk),
            RiskCategory::Sensitive => classification.sensitive_attributes.push(risk),
            RiskCategory::NonSensitive => classification.non_sensitive.push(risk),
        }
    }

    sort_by_risk_desc(&mut classification.quasi_identifiers);
    sort_by_risk_desc(&mut classification.sensitive_attributes);
    sort_by_risk_desc(&mut classification.non_sensitive);
    classification
}

/// Column classifier for scoring re-identification risk.
///
/// # Example
///
/// ```rust,ignore
/// use anonsurveyor_core::classification::{ColumnClassifier, RiskThresholds};
///
/// let classifier = ColumnClassifier::with_defaults();
/// let thresholds = RiskThresholds::new(80.0, 20.0)?;
/// let report = classifier.classify(dataset, &["name"], Some(thresholds))?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ColumnClassifier {
    config: ClassifierConfig,
}

impl ColumnClassifier {
    /// Creates a new classifier with the given configuration.
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Creates a new classifier with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ClassifierConfig::default())
    }

    /// Returns a reference to the classifier configuration.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Scores a dataset and optionally classifies its columns.
    ///
    /// # Arguments
    /// * `dataset` - The snapshot to score; owned by this pass
    /// * `direct_identifiers` - Columns removed before scoring
    /// * `thresholds` - α/β thresholds; `None` produces risk rates only
    ///
    /// # Errors
    /// Unknown direct identifiers, an invalid configuration, or a dataset
    /// without rows or columns after filtering.
    pub fn classify<S: AsRef<str>>(
        &self,
        mut dataset: Dataset,
        direct_identifiers: &[S],
        thresholds: Option<RiskThresholds>,
    ) -> Result<ClassificationReport> {
        self.config.validate()?;

        dataset.drop_columns(direct_identifiers)?;
        let pruned_columns: Vec<String> = direct_identifiers
            .iter()
            .map(|name| name.as_ref().to_string())
            .collect();

        let (dataset, dropped_columns) = filter_columns_na(dataset, &self.config)?;

        if dataset.column_count() == 0 {
            return Err(AnonSurveyorError::invalid_input(format!(
                "dataset '{}' has no columns left to score",
                dataset.name()
            )));
        }
        if dataset.is_empty() {
            return Err(AnonSurveyorError::invalid_input(format!(
                "dataset '{}' has no rows",
                dataset.name()
            )));
        }

        let weights = compute_distinct_weights(&dataset);
        let rates = compute_risk_rates(&weights)?;

        tracing::info!(
            "Scored {} columns over {} rows in '{}'",
            rates.len(),
            dataset.row_count(),
            dataset.name()
        );

        let report = ClassificationReport::new(dataset.name(), dataset.row_count() as u64)
            .with_pruned_columns(pruned_columns)
            .with_dropped_columns(dropped_columns)
            .with_risk_rates(
                rates
                    .into_iter()
                    .map(|(name, rate)| ColumnRisk::new(name, rate))
                    .collect(),
            );

        Ok(match thresholds {
            Some(thresholds) => Self::apply_thresholds(report, thresholds),
            None => report,
        })
    }

    /// Classifies the risk rates of an existing report.
    ///
    /// Supports the two-step flow where thresholds are chosen after looking
    /// at the rates.
    pub fn apply_thresholds(
        report: ClassificationReport,
        thresholds: RiskThresholds,
    ) -> ClassificationReport {
        let classification = classify_with(report.risk_rates.iter().cloned(), &thresholds);

        tracing::info!(
            "Classified columns: {} QIDs, {} sensitive, {} non-sensitive (alpha={}, beta={})",
            classification.quasi_identifiers.len(),
            classification.sensitive_attributes.len(),
            classification.non_sensitive.len(),
            thresholds.alpha(),
            thresholds.beta()
        );

        report.with_classification(thresholds, classification)
    }
}
