//! t-closeness measurement.
//!
//! For each sensitive attribute the distribution inside every group is
//! compared with the distribution over the whole dataset; the worst group
//! wins, and the worst attribute wins across attributes.
//!
//! Distance formulas sit behind [`DistributionDistance`] so the grouping and
//! max-reduction logic does not depend on the attribute type.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{AnonSurveyorError, Result};
use crate::models::{AttributeKind, Cell, Column, Dataset};

use super::config::TClosenessMode;
use super::grouping::QidGrouping;

/// Distance between two probability distributions over the same domain.
///
/// Both slices are indexed by the sorted attribute domain and sum to 1.
pub trait DistributionDistance {
    /// Computes the distance; 0 means identical distributions.
    fn distance(&self, group: &[f64], reference: &[f64]) -> f64;
}

/// Earth Mover's Distance over an ordered domain of `m` values:
/// `Σ |r_1 + … + r_i| / (m − 1)` with `r = group − reference`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderedDistance;

impl DistributionDistance for OrderedDistance {
    fn distance(&self, group: &[f64], reference: &[f64]) -> f64 {
        let m = reference.len();
        if m <= 1 {
            return 0.0;
        }

        let mut cumulative = 0.0;
        let mut total = 0.0;
        for (p, q) in group.iter().zip(reference) {
            cumulative += p - q;
            total += f64::abs(cumulative);
        }
        total / (m - 1) as f64
    }
}

/// Variation distance for unordered categories: `½ Σ |p_i − q_i|`.
#[derive(Debug, Clone, Copy, Default)]
pub struct VariationDistance;

impl DistributionDistance for VariationDistance {
    fn distance(&self, group: &[f64], reference: &[f64]) -> f64 {
        0.5 * group
            .iter()
            .zip(reference)
            .map(|(p, q)| (p - q).abs())
            .sum::<f64>()
    }
}

/// Picks the distance metric for a sensitive attribute.
///
/// Booleans are treated as the two-point ordered domain `false < true`.
pub fn distance_for(column: &Column) -> Box<dyn DistributionDistance> {
    match column.attribute_kind() {
        AttributeKind::Numeric | AttributeKind::Boolean => Box::new(OrderedDistance),
        AttributeKind::Categorical => Box::new(VariationDistance),
    }
}

/// t-closeness of one sensitive attribute under an existing grouping.
pub fn attribute_t_closeness(
    dataset: &Dataset,
    grouping: &QidGrouping,
    sensitive_attribute: &str,
) -> Result<f64> {
    let column = dataset.column(sensitive_attribute)?;
    let metric = distance_for(column);

    // Sorted domain: numbers ascend by value, which the ordered metric needs
    let domain: BTreeSet<&Cell> = column.cells().iter().collect();
    let positions: BTreeMap<&Cell, usize> = domain
        .into_iter()
        .enumerate()
        .map(|(position, cell)| (cell, position))
        .collect();

    let distribution = |rows: &mut dyn Iterator<Item = usize>| -> Vec<f64> {
        let mut counts = vec![0usize; positions.len()];
        let mut total = 0usize;
        for row in rows {
            if let Some(&position) = positions.get(&column.cells()[row]) {
                counts[position] += 1;
                total += 1;
            }
        }
        counts
            .into_iter()
            .map(|count| count as f64 / total.max(1) as f64)
            .collect()
    };

    let reference = distribution(&mut (0..dataset.row_count()));

    let t = grouping
        .groups()
        .iter()
        .map(|rows| metric.distance(&distribution(&mut rows.iter().copied()), &reference))
        .fold(0.0, f64::max);

    tracing::trace!("t-closeness of '{}': {}", sensitive_attribute, t);
    Ok(t)
}

/// Maximum t-closeness across all sensitive attributes.
///
/// In [`TClosenessMode::Global`] groups are formed by the QIDs; in
/// [`TClosenessMode::Conditional`] the other declared sensitive attributes
/// are added as grouping columns.
pub fn t_closeness<Q: AsRef<str>, S: AsRef<str>>(
    dataset: &Dataset,
    qids: &[Q],
    sensitive_attributes: &[S],
    mode: TClosenessMode,
) -> Result<f64> {
    if sensitive_attributes.is_empty() {
        return Err(AnonSurveyorError::invalid_input(
            "at least one sensitive attribute is required for t-closeness",
        ));
    }
    // Validate every declared column before measuring anything
    dataset.resolve_columns(qids)?;
    dataset.resolve_columns(sensitive_attributes)?;

    let qid_names: Vec<&str> = qids.iter().map(AsRef::as_ref).collect();
    let shared = match mode {
        TClosenessMode::Global => Some(QidGrouping::build(dataset, &qid_names)?),
        TClosenessMode::Conditional => None,
    };

    let mut worst: f64 = 0.0;
    for (index, attribute) in sensitive_attributes.iter().enumerate() {
        let attribute = attribute.as_ref();
        let t = match &shared {
            Some(grouping) => attribute_t_closeness(dataset, grouping, attribute)?,
            None => {
                let mut columns = qid_names.clone();
                columns.extend(
                    sensitive_attributes
                        .iter()
                        .enumerate()
                        .filter(|&(other, _)| other != index)
                        .map(|(_, name)| name.as_ref()),
                );
                let grouping = QidGrouping::build(dataset, &columns)?;
                attribute_t_closeness(dataset, &grouping, attribute)?
            }
        };
        worst = worst.max(t);
    }

    Ok(worst)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn create_dataset() -> Dataset {
        Dataset::new(
            "patients",
            vec![
                Column::new(
                    "zip",
                    ["a", "a", "b", "b"].iter().map(|v| Cell::text(*v)).collect(),
                ),
                Column::new(
                    "salary",
                    [1.0, 2.0, 3.0, 4.0].iter().copied().map(Cell::Number).collect(),
                ),
                Column::new(
                    "disease",
                    ["flu", "flu", "cold", "cold"].iter().map(|v| Cell::text(*v)).collect(),
                ),
                Column::new(
                    "smoker",
                    vec![Cell::Bool(true), Cell::Bool(false), Cell::Bool(true), Cell::Missing],
                ),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_ordered_distance() {
        // r = (0.25, 0.25, -0.25, -0.25), cumulative |.| = 0.25, 0.5, 0.25, 0.0
        let group = [0.5, 0.5, 0.0, 0.0];
        let reference = [0.25, 0.25, 0.25, 0.25];
        let d = OrderedDistance.distance(&group, &reference);
        assert!((d - 1.0 / 3.0).abs() < EPSILON);

        // All mass moved across the whole domain
        let d = OrderedDistance.distance(&[1.0, 0.0, 0.0], &[0.0, 0.0, 1.0]);
        assert!((d - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_ordered_distance_single_value_domain() {
        assert_eq!(OrderedDistance.distance(&[1.0], &[1.0]), 0.0);
    }

    #[test]
    fn test_variation_distance() {
        let d = VariationDistance.distance(&[1.0, 0.0], &[0.5, 0.5]);
        assert!((d - 0.5).abs() < EPSILON);
        assert_eq!(VariationDistance.distance(&[0.5, 0.5], &[0.5, 0.5]), 0.0);
    }

    #[test]
    fn test_numeric_attribute_uses_ordered_distance() {
        let dataset = create_dataset();
        let t = t_closeness(&dataset, &["zip"], &["salary"], TClosenessMode::Global).unwrap();
        // group a: (0.5, 0.5, 0, 0) vs uniform -> 1/3
        assert!((t - 1.0 / 3.0).abs() < EPSILON);
    }

    #[test]
    fn test_categorical_attribute_uses_variation_distance() {
        let dataset = create_dataset();
        let t = t_closeness(&dataset, &["zip"], &["disease"], TClosenessMode::Global).unwrap();
        assert!((t - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_max_across_attributes() {
        let dataset = create_dataset();
        let t = t_closeness(
            &dataset,
            &["zip"],
            &["disease", "salary"],
            TClosenessMode::Global,
        )
        .unwrap();
        assert!((t - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_single_group_is_perfectly_close() {
        let dataset = create_dataset();
        let grouping = QidGrouping::build(
            &Dataset::new("one", vec![Column::new("q", vec![Cell::text("*"); 4])]).unwrap(),
            &["q"],
        )
        .unwrap();
        let t = attribute_t_closeness(&dataset, &grouping, "salary").unwrap();
        assert!(t.abs() < EPSILON);
    }

    #[test]
    fn test_conditional_mode_groups_by_other_attributes() {
        let dataset = create_dataset();
        // Grouping by zip + disease gives the same groups as zip alone here
        let global =
            t_closeness(&dataset, &["zip"], &["salary", "disease"], TClosenessMode::Global)
                .unwrap();
        let conditional = t_closeness(
            &dataset,
            &["zip"],
            &["salary", "disease"],
            TClosenessMode::Conditional,
        )
        .unwrap();
        assert!((global - conditional).abs() < EPSILON);
    }

    #[test]
    fn test_boolean_attribute_uses_ordered_distance() {
        let dataset = create_dataset();
        // Domain (missing, false, true), overall (1/4, 1/4, 1/2)
        // group a: (0, 1/2, 1/2) -> cumulative |.| 1/4, 0, 0 over m - 1 = 2
        // group b: (1/2, 0, 1/2) -> cumulative |.| 1/4, 0, 0 over m - 1 = 2
        let t = t_closeness(&dataset, &["zip"], &["smoker"], TClosenessMode::Global).unwrap();
        assert!((t - 0.125).abs() < EPSILON);

        let column = dataset.column("smoker").unwrap();
        let ordered = distance_for(column).distance(&[1.0, 0.0], &[0.0, 1.0]);
        assert!((ordered - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_t_closeness_input_validation() {
        let dataset = create_dataset();
        assert!(matches!(
            t_closeness(&dataset, &["zip"], &[] as &[&str], TClosenessMode::Global),
            Err(AnonSurveyorError::InvalidInput { .. })
        ));
        assert!(matches!(
            t_closeness(&dataset, &["zip"], &["income"], TClosenessMode::Global),
            Err(AnonSurveyorError::UnknownColumn { .. })
        ));
        assert!(matches!(
            t_closeness(&dataset, &["city"], &["salary"], TClosenessMode::Global),
            Err(AnonSurveyorError::UnknownColumn { .. })
        ));
    }
}
