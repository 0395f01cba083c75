//! Non-uniform entropy (NUE) utility loss.
//!
//! For every row and column the loss is `−ln(p_orig / p_after)`, where `p` is
//! the share of rows carrying that row's value. Generalizing a value makes it
//! more common, so the ratio drops below 1 and the loss grows. Identical
//! snapshots score 0; a fully suppressed snapshot scores the maximum.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{AnonSurveyorError, DegenerateMetric, Result};
use crate::models::{Cell, Column, Dataset};
use crate::stats::round2;

fn column_entropy(original: &Column, after: &Column) -> f64 {
    let before_counts: HashMap<&Cell, usize> = original.value_counts();
    let after_counts: HashMap<&Cell, usize> = after.value_counts();

    original
        .cells()
        .iter()
        .zip(after.cells())
        .map(|(before, after)| {
            // Both lookups hit: every cell is counted in its own column
            let count_before = before_counts.get(before).copied().unwrap_or(1) as f64;
            let count_after = after_counts.get(after).copied().unwrap_or(1) as f64;
            -(count_before / count_after).ln()
        })
        .sum()
}

/// Total non-uniform entropy between two row-aligned snapshots over `columns`.
///
/// An empty column list scores 0.
///
/// # Errors
/// The snapshots differ in row count, or a column is missing from either one.
pub fn non_uniform_entropy<S: AsRef<str>>(
    original: &Dataset,
    after: &Dataset,
    columns: &[S],
) -> Result<f64> {
    if original.row_count() != after.row_count() {
        return Err(AnonSurveyorError::invalid_input(format!(
            "datasets '{}' ({} rows) and '{}' ({} rows) are not row-aligned",
            original.name(),
            original.row_count(),
            after.name(),
            after.row_count()
        )));
    }

    let before_columns = original.resolve_columns(columns)?;
    let after_columns = after.resolve_columns(columns)?;

    let total = before_columns
        .into_iter()
        .zip(after_columns)
        .map(|(before, after)| column_entropy(before, after))
        .sum::<f64>();

    tracing::trace!(
        "NUE between '{}' and '{}': {}",
        original.name(),
        after.name(),
        total
    );
    Ok(total)
}

/// Maps `value` into a percentage of `[min, max]`, rounded to two decimals.
///
/// # Errors
/// `max == min` is a degenerate range; `max < min` or a non-finite bound is
/// invalid input.
pub fn normalize_entropy(value: f64, min: f64, max: f64) -> Result<f64> {
    check_range(min, max)?;
    Ok(round2((value - min) / (max - min) * 100.0))
}

fn check_range(min: f64, max: f64) -> Result<()> {
    if !min.is_finite() || !max.is_finite() || max < min {
        return Err(AnonSurveyorError::invalid_input(format!(
            "entropy bounds are inverted or not finite (min {min}, max {max})"
        )));
    }
    if max == min {
        return Err(DegenerateMetric::ZeroEntropyRange { value: max }.into());
    }
    Ok(())
}

/// NUE of the untouched and of the fully suppressed snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntropyBounds {
    /// NUE of the original against itself
    pub min: f64,
    /// NUE of the original against the fully suppressed snapshot
    pub max: f64,
}

impl EntropyBounds {
    /// Computes the bounds over the QID columns.
    ///
    /// # Errors
    /// Input errors from [`non_uniform_entropy`],
    /// [`DegenerateMetric::ZeroEntropyRange`] when suppression changes nothing,
    /// or an input error when the suppressed snapshot is less uniform than the
    /// original.
    pub fn compute<S: AsRef<str>>(
        original: &Dataset,
        suppressed: &Dataset,
        qids: &[S],
    ) -> Result<Self> {
        let min = non_uniform_entropy(original, original, qids)?;
        let max = non_uniform_entropy(original, suppressed, qids)?;
        check_range(min, max)?;

        tracing::debug!("Entropy bounds: min {}, max {}", min, max);
        Ok(Self { min, max })
    }

    /// Normalizes `value` into these bounds.
    pub fn normalize(&self, value: f64) -> Result<f64> {
        normalize_entropy(value, self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(name: &str, values: &[&str]) -> Dataset {
        Dataset::new(
            name,
            vec![Column::new(
                "zip",
                values.iter().map(|v| Cell::text(*v)).collect(),
            )],
        )
        .unwrap()
    }

    #[test]
    fn test_identical_snapshots_have_zero_entropy() {
        let dataset = single("orig", &["9000", "9050", "9050", "9100"]);
        let nue = non_uniform_entropy(&dataset, &dataset, &["zip"]).unwrap();
        assert_eq!(nue, 0.0);
    }

    #[test]
    fn test_full_suppression_entropy() {
        let original = single("orig", &["a", "b", "c", "d"]);
        let suppressed = single("sup", &["*", "*", "*", "*"]);
        let nue = non_uniform_entropy(&original, &suppressed, &["zip"]).unwrap();
        // Four rows of -ln(1/4)
        assert!((nue - 4.0 * 4f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn test_partial_generalization_between_bounds() {
        let original = single("orig", &["9000", "9001", "9050", "9051"]);
        let partial = single("mid", &["90*", "90*", "905*", "905*"]);
        let suppressed = single("sup", &["*", "*", "*", "*"]);

        let bounds = EntropyBounds::compute(&original, &suppressed, &["zip"]).unwrap();
        let nue = non_uniform_entropy(&original, &partial, &["zip"]).unwrap();
        assert!(nue > bounds.min && nue < bounds.max);
        // 4·ln 2 over 4·ln 4
        assert_eq!(bounds.normalize(nue).unwrap(), 50.0);
    }

    #[test]
    fn test_empty_column_list_scores_zero() {
        let dataset = single("orig", &["a", "b"]);
        assert_eq!(
            non_uniform_entropy(&dataset, &dataset, &[] as &[&str]).unwrap(),
            0.0
        );
    }

    #[test]
    fn test_entropy_input_validation() {
        let original = single("orig", &["a", "b", "c"]);
        let shorter = single("after", &["a", "b"]);
        assert!(matches!(
            non_uniform_entropy(&original, &shorter, &["zip"]),
            Err(AnonSurveyorError::InvalidInput { .. })
        ));
        assert!(matches!(
            non_uniform_entropy(&original, &original, &["age"]),
            Err(AnonSurveyorError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn test_normalize_entropy() {
        assert_eq!(normalize_entropy(0.0, 0.0, 10.0).unwrap(), 0.0);
        assert_eq!(normalize_entropy(10.0, 0.0, 10.0).unwrap(), 100.0);
        assert_eq!(normalize_entropy(1.0, 0.0, 3.0).unwrap(), 33.33);
    }

    #[test]
    fn test_normalize_zero_range_is_degenerate() {
        let err = normalize_entropy(1.0, 2.0, 2.0).unwrap_err();
        assert_eq!(
            err.as_degenerate(),
            Some(&DegenerateMetric::ZeroEntropyRange { value: 2.0 })
        );

        let err = normalize_entropy(1.0, 3.0, 2.0).unwrap_err();
        assert!(err.is_input_validation());
    }

    #[test]
    fn test_bounds_reject_suppression_less_uniform_than_original() {
        let original = single("orig", &["*", "*", "*"]);
        let scattered = single("sup", &["a", "b", "c"]);
        let err = EntropyBounds::compute(&original, &scattered, &["zip"]).unwrap_err();
        assert!(err.is_input_validation());
        assert!(!err.is_degenerate());
    }

    #[test]
    fn test_normalize_rejects_non_finite_bounds() {
        assert!(normalize_entropy(1.0, 0.0, f64::INFINITY).unwrap_err().is_input_validation());
        assert!(normalize_entropy(1.0, f64::NAN, 2.0).unwrap_err().is_input_validation());
    }

    #[test]
    fn test_bounds_degenerate_when_suppression_changes_nothing() {
        let original = single("orig", &["*", "*"]);
        let err = EntropyBounds::compute(&original, &original, &["zip"]).unwrap_err();
        assert!(err.is_degenerate());
    }
}
