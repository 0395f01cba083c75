//! Evaluation session driving the dimension selection loop.

use std::collections::HashSet;

use chrono::Utc;

use crate::error::{AnonSurveyorError, Result};
use crate::models::Dataset;
use crate::stats::round2;

use super::config::{EvaluatorConfig, TClosenessMode};
use super::dimension::{DimensionRecord, privacy_gain, select_optimal_dimension};
use super::entropy::{EntropyBounds, non_uniform_entropy};
use super::grouping::QidGrouping;
use super::models::{
    AnonymityBaseline, AttemptMeasurement, AttributeDiversity, DeidentificationAttempt,
    EvaluationOutcome, SensitiveDiversity,
};
use super::t_closeness::{attribute_t_closeness, t_closeness};

/// k, l and t of one dataset snapshot.
///
/// The QID grouping is built once and shared by every metric; conditional
/// t-closeness needs its own groupings and builds them separately.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotProfile {
    /// Smallest QID group size
    pub k_anonymity: usize,
    /// Worst t-closeness across sensitive attributes
    pub t_closeness: f64,
    /// Per sensitive attribute, in declaration order
    pub l_diversity: Vec<AttributeDiversity>,
}

impl SnapshotProfile {
    /// Measures a snapshot.
    pub fn measure(
        dataset: &Dataset,
        qids: &[String],
        sensitive_attributes: &[String],
        mode: TClosenessMode,
    ) -> Result<Self> {
        let grouping = QidGrouping::build(dataset, qids)?;

        let l_diversity = sensitive_attributes
            .iter()
            .map(|attribute| {
                Ok(AttributeDiversity {
                    attribute: attribute.clone(),
                    l_diversity: grouping.min_distinct(dataset.column(attribute)?),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let t = match mode {
            TClosenessMode::Global => {
                let mut worst: f64 = 0.0;
                for attribute in sensitive_attributes {
                    worst = worst.max(attribute_t_closeness(dataset, &grouping, attribute)?);
                }
                worst
            }
            TClosenessMode::Conditional => t_closeness(dataset, qids, sensitive_attributes, mode)?,
        };

        Ok(Self {
            k_anonymity: grouping.min_group_size(),
            t_closeness: t,
            l_diversity,
        })
    }
}

/// Caller-driven sequence of de-identification attempts over one original
/// dataset.
///
/// The baseline and the entropy bounds are computed once at construction.
/// Every evaluated attempt is retained; a failed attempt leaves the session
/// unchanged.
///
/// # Example
/// ```rust,ignore
/// let mut session = EvaluationSession::new(config, original, &suppressed, qids, sas)?;
/// while !session.is_complete() {
///     session.evaluate(next_attempt()?)?;
/// }
/// let outcome = session.finish()?;
/// println!("{}", outcome.advice());
/// ```
#[derive(Debug)]
pub struct EvaluationSession {
    config: EvaluatorConfig,
    original: Dataset,
    qids: Vec<String>,
    sensitive_attributes: Vec<String>,
    baseline: AnonymityBaseline,
    covered: HashSet<String>,
    measurements: Vec<AttemptMeasurement>,
}

impl EvaluationSession {
    /// Starts a session.
    ///
    /// # Arguments
    /// * `original` - The untouched dataset
    /// * `suppressed` - The same rows with every QID fully suppressed
    /// * `qids` - Declared QIDs, highest risk first
    /// * `sensitive_attributes` - Declared sensitive attributes
    ///
    /// # Errors
    /// Invalid configuration, empty or unknown column lists, misaligned
    /// datasets, or entropy bounds that coincide or are inverted.
    pub fn new(
        config: EvaluatorConfig,
        original: Dataset,
        suppressed: &Dataset,
        qids: Vec<String>,
        sensitive_attributes: Vec<String>,
    ) -> Result<Self> {
        config.validate()?;

        if qids.is_empty() {
            return Err(AnonSurveyorError::invalid_input(
                "at least one quasi-identifier must be declared",
            ));
        }
        if sensitive_attributes.is_empty() {
            return Err(AnonSurveyorError::invalid_input(
                "at least one sensitive attribute must be declared",
            ));
        }
        if let Some(duplicate) = first_duplicate(qids.iter().chain(&sensitive_attributes)) {
            return Err(AnonSurveyorError::invalid_input(format!(
                "column '{duplicate}' is declared more than once"
            )));
        }

        let profile =
            SnapshotProfile::measure(&original, &qids, &sensitive_attributes, config.t_closeness_mode)?;
        let entropy_bounds = EntropyBounds::compute(&original, suppressed, &qids)?;

        let baseline = AnonymityBaseline {
            k_anonymity: profile.k_anonymity,
            t_closeness: profile.t_closeness,
            l_diversity: profile.l_diversity,
            entropy_bounds,
        };

        tracing::info!(
            "Baseline for '{}': k={}, t={:.4}",
            original.name(),
            baseline.k_anonymity,
            baseline.t_closeness
        );

        Ok(Self {
            config,
            original,
            qids,
            sensitive_attributes,
            baseline,
            covered: HashSet::new(),
            measurements: Vec::new(),
        })
    }

    /// Measures one attempt and retains it.
    ///
    /// # Errors
    /// The attempt's QID list is empty, repeats a column, or names a column
    /// that is not a declared QID; or the snapshot cannot be measured against
    /// the original.
    pub fn evaluate(&mut self, attempt: DeidentificationAttempt) -> Result<&AttemptMeasurement> {
        self.validate_attempt(&attempt)?;

        let after = &attempt.after;
        let profile = SnapshotProfile::measure(
            after,
            &self.qids,
            &self.sensitive_attributes,
            self.config.t_closeness_mode,
        )?;

        // Utility loss counts only the QIDs this attempt claims to have touched
        let nue = non_uniform_entropy(&self.original, after, &attempt.deidentified_qids)?;
        let nue_percentage = self.baseline.entropy_bounds.normalize(nue)?;
        let inverse_nue_percentage = round2(100.0 - nue_percentage);

        let l_diversity = self
            .baseline
            .l_diversity
            .iter()
            .zip(profile.l_diversity)
            .map(|(before, after)| SensitiveDiversity {
                attribute: after.attribute,
                before: before.l_diversity,
                after: after.l_diversity,
            })
            .collect();

        let measurement = AttemptMeasurement {
            dimension: attempt.dimension(),
            k_before: self.baseline.k_anonymity,
            k_after: profile.k_anonymity,
            t_before: self.baseline.t_closeness,
            t_after: profile.t_closeness,
            l_diversity,
            privacy_gain: privacy_gain(profile.k_anonymity, self.baseline.k_anonymity),
            nue,
            nue_percentage,
            inverse_nue_percentage,
            deidentified_qids: attempt.deidentified_qids,
        };

        tracing::debug!(
            "Attempt '{}' dimension {}: k {} -> {}, pg {}, NUE {:.4} ({}%), inverse {}%",
            after.name(),
            measurement.dimension,
            measurement.k_before,
            measurement.k_after,
            measurement.privacy_gain,
            measurement.nue,
            measurement.nue_percentage,
            measurement.inverse_nue_percentage
        );

        self.covered.extend(measurement.deidentified_qids.iter().cloned());
        if self.is_complete() {
            tracing::info!(
                "All {} declared QIDs covered after {} attempts",
                self.qids.len(),
                self.measurements.len() + 1
            );
        }

        self.measurements.push(measurement);
        self.measurements
            .last()
            .ok_or_else(|| AnonSurveyorError::invalid_input("attempt measurement was not retained"))
    }

    fn validate_attempt(&self, attempt: &DeidentificationAttempt) -> Result<()> {
        if attempt.deidentified_qids.is_empty() {
            return Err(AnonSurveyorError::invalid_input(format!(
                "attempt '{}' does not name any de-identified QID",
                attempt.after.name()
            )));
        }
        if let Some(duplicate) = first_duplicate(attempt.deidentified_qids.iter()) {
            return Err(AnonSurveyorError::invalid_input(format!(
                "attempt '{}' lists QID '{duplicate}' more than once",
                attempt.after.name()
            )));
        }
        if let Some(unknown) = attempt
            .deidentified_qids
            .iter()
            .find(|qid| !self.qids.contains(*qid))
        {
            return Err(AnonSurveyorError::invalid_input(format!(
                "'{unknown}' is not a declared quasi-identifier"
            )));
        }
        Ok(())
    }

    /// True once every declared QID was de-identified by some attempt.
    pub fn is_complete(&self) -> bool {
        self.qids.iter().all(|qid| self.covered.contains(qid))
    }

    /// Declared QIDs not yet covered by any attempt, in declaration order.
    pub fn remaining_qids(&self) -> Vec<&str> {
        self.qids
            .iter()
            .filter(|qid| !self.covered.contains(*qid))
            .map(String::as_str)
            .collect()
    }

    /// Declared QIDs, highest risk first.
    pub fn quasi_identifiers(&self) -> &[String] {
        &self.qids
    }

    /// Declared sensitive attributes.
    pub fn sensitive_attributes(&self) -> &[String] {
        &self.sensitive_attributes
    }

    /// Anonymity of the original dataset.
    pub fn baseline(&self) -> &AnonymityBaseline {
        &self.baseline
    }

    /// Measurements in attempt order.
    pub fn measurements(&self) -> &[AttemptMeasurement] {
        &self.measurements
    }

    /// Dimension records in attempt order.
    pub fn records(&self) -> Vec<DimensionRecord> {
        self.measurements.iter().map(AttemptMeasurement::record).collect()
    }

    /// Selects the optimal dimension over every retained attempt.
    ///
    /// The session stays usable, so a caller hitting a degenerate result can
    /// supply further attempts and try again.
    ///
    /// # Errors
    /// No attempt was evaluated, or none reached the minimum k-anonymity.
    pub fn finish(&self) -> Result<EvaluationOutcome> {
        if self.measurements.is_empty() {
            return Err(AnonSurveyorError::invalid_input(
                "no de-identification attempt has been evaluated",
            ));
        }
        if !self.is_complete() {
            tracing::warn!(
                "Selecting a dimension before all QIDs are covered; remaining: {}",
                self.remaining_qids().join(", ")
            );
        }

        let records = self.records();
        let optimal = select_optimal_dimension(&records, self.config.min_k_anonymity)?;

        tracing::info!(
            "Optimal dimension {} (pg {}, inverse NUE {}%)",
            optimal.dimension,
            optimal.privacy_gain,
            optimal.inverse_nue
        );

        Ok(EvaluationOutcome {
            dataset_name: self.original.name().to_string(),
            quasi_identifiers: self.qids.clone(),
            sensitive_attributes: self.sensitive_attributes.clone(),
            baseline: self.baseline.clone(),
            measurements: self.measurements.clone(),
            optimal_dimension: optimal.dimension,
            recommended_qids: self.qids.iter().take(optimal.dimension).cloned().collect(),
            evaluated_at: Utc::now(),
        })
    }
}

fn first_duplicate<'a>(names: impl Iterator<Item = &'a String>) -> Option<&'a str> {
    let mut seen: HashSet<&str> = HashSet::new();
    names.map(String::as_str).find(|name| !seen.insert(*name))
}
