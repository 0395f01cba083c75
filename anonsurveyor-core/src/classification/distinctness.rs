//! Distinctness weighting and re-identification risk rates.
//!
//! Every row of a column gets the weight `1 / count(value)`. A column of
//! unique values weighs 1 everywhere (maximum risk), a constant column weighs
//! `1 / rows` everywhere (minimum risk). The risk rate is the mean row weight
//! scaled to 0-100.

use std::collections::BTreeMap;

use crate::error::{AnonSurveyorError, Result};
use crate::models::{Column, Dataset};
use crate::stats::{mean, round2};

/// Inverse-frequency weight of every row of a column.
pub fn column_weights(column: &Column) -> Vec<f64> {
    let counts = column.value_counts();
    column
        .cells()
        .iter()
        .map(|cell| counts.get(cell).map_or(0.0, |&count| 1.0 / count as f64))
        .collect()
}

/// Computes per-row inverse-frequency weights for every column.
///
/// Each sequence has one entry per row, so repeated values repeat their
/// weight.
pub fn compute_distinct_weights(dataset: &Dataset) -> BTreeMap<String, Vec<f64>> {
    dataset
        .columns()
        .iter()
        .map(|column| (column.name().to_string(), column_weights(column)))
        .collect()
}

/// Turns row weights into risk rates: `round(mean(weights) × 100, 2)`.
pub fn compute_risk_rates(weights: &BTreeMap<String, Vec<f64>>) -> Result<BTreeMap<String, f64>> {
    weights
        .iter()
        .map(|(column_name, column_weights)| {
            let average = mean(column_weights).ok_or_else(|| {
                AnonSurveyorError::invalid_input(format!(
                    "cannot compute a risk rate for column '{}' without rows",
                    column_name
                ))
            })?;
            let rate = round2(average * 100.0);
            tracing::debug!("Risk rate for '{}': {:.2}", column_name, rate);
            Ok((column_name.clone(), rate))
        })
        .collect()
}
