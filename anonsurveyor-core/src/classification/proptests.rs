//! Property tests for risk scoring and classification.

use std::collections::{BTreeMap, HashSet};

use proptest::prelude::*;

use super::*;
use crate::models::{Cell, Column, Dataset};

fn risk_rate_of(cells: Vec<Cell>) -> f64 {
    let dataset = Dataset::new("p", vec![Column::new("c", cells)]).unwrap();
    let rates = compute_risk_rates(&compute_distinct_weights(&dataset)).unwrap();
    rates["c"]
}

proptest! {
    #[test]
    fn test_unique_values_score_exactly_100(rows in 1usize..200) {
        let cells = (0..rows).map(|i| Cell::Number(i as f64)).collect();
        prop_assert_eq!(risk_rate_of(cells), 100.0);
    }

    #[test]
    fn test_constant_column_scores_100_over_rows(rows in 1usize..200) {
        let cells = vec![Cell::text("same"); rows];
        let expected = 100.0 / rows as f64;
        prop_assert!((risk_rate_of(cells) - expected).abs() <= 0.005 + 1e-9);
    }

    #[test]
    fn test_risk_rate_within_bounds(values in prop::collection::vec(0u8..5, 1..100)) {
        let cells = values.into_iter().map(|v| Cell::Number(f64::from(v))).collect();
        let rate = risk_rate_of(cells);
        prop_assert!(rate > 0.0 && rate <= 100.0);
    }

    #[test]
    fn test_classification_is_a_partition(
        rates in prop::collection::btree_map("[a-z]{1,6}", 0.0f64..=100.0, 0..20),
        a in 0.0f64..=100.0,
        b in 0.0f64..=100.0,
    ) {
        let (alpha, beta) = if a >= b { (a, b) } else { (b, a) };
        let classification = classify_columns(&rates, beta, alpha).unwrap();

        let mut seen: HashSet<&str> = HashSet::new();
        for risk in classification
            .quasi_identifiers
            .iter()
            .chain(&classification.sensitive_attributes)
            .chain(&classification.non_sensitive)
        {
            prop_assert!(seen.insert(risk.column_name.as_str()), "column classified twice");
        }
        let all: HashSet<&str> = rates.keys().map(String::as_str).collect();
        prop_assert_eq!(seen, all);
    }

    #[test]
    fn test_inverted_thresholds_always_fail(low in 0.0f64..50.0, gap in 0.001f64..50.0) {
        let rates: BTreeMap<String, f64> = BTreeMap::new();
        prop_assert!(classify_columns(&rates, low + gap, low).is_err());
    }
}
