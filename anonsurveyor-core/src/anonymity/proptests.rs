//! Property tests for anonymity metrics and dimension selection.

use proptest::prelude::*;

use super::*;
use crate::models::{Cell, Column, Dataset};

fn text_column(name: &str, values: &[String]) -> Column {
    Column::new(name, values.iter().map(|v| Cell::text(v.as_str())).collect())
}

/// Pairs of rows share age and ZIP; the two rows of a pair differ in disease.
fn paired_patients(pairs: usize) -> Dataset {
    let rows = pairs * 2;
    let age: Vec<String> = vec!["30".to_string(); rows];
    let zip: Vec<String> = (0..rows).map(|row| format!("90{:02}", row / 2)).collect();
    let disease: Vec<String> = (0..rows)
        .map(|row| if row % 2 == 0 { "flu" } else { "cold" }.to_string())
        .collect();
    Dataset::new(
        "patients",
        vec![
            text_column("age", &age),
            text_column("zip", &zip),
            text_column("disease", &disease),
        ],
    )
    .unwrap()
}

fn with_zip(dataset: &Dataset, name: &str, zip: &str) -> Dataset {
    let columns = dataset
        .columns()
        .iter()
        .map(|column| {
            if column.name() == "zip" {
                Column::new("zip", vec![Cell::text(zip); dataset.row_count()])
            } else {
                column.clone()
            }
        })
        .collect();
    Dataset::new(name, columns).unwrap()
}

fn arb_record() -> impl Strategy<Value = DimensionRecord> {
    (-50i64..50, 0.0f64..=100.0, 0usize..10, 1usize..8).prop_map(
        |(privacy_gain, inverse_nue, k_after, dimension)| DimensionRecord {
            privacy_gain,
            inverse_nue,
            k_after,
            dimension,
        },
    )
}

proptest! {
    #[test]
    fn test_privacy_gain_antisymmetric(a in 0usize..10_000, b in 0usize..10_000) {
        prop_assert_eq!(privacy_gain(a, b), -privacy_gain(b, a));
    }

    #[test]
    fn test_entropy_of_identical_snapshots_is_zero(values in prop::collection::vec("[a-c]{1,2}", 1..50)) {
        let dataset = Dataset::new("x", vec![text_column("q", &values)]).unwrap();
        prop_assert_eq!(non_uniform_entropy(&dataset, &dataset, &["q"]).unwrap(), 0.0);
    }

    #[test]
    fn test_normalize_monotonic(
        min in -100.0f64..100.0,
        width in 0.01f64..100.0,
        a in 0.0f64..=1.0,
        b in 0.0f64..=1.0,
    ) {
        let max = min + width;
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let low = normalize_entropy(min + low * width, min, max).unwrap();
        let high = normalize_entropy(min + high * width, min, max).unwrap();
        prop_assert!(low <= high);
        prop_assert_eq!(normalize_entropy(min, min, max).unwrap(), 0.0);
        prop_assert_eq!(normalize_entropy(max, min, max).unwrap(), 100.0);
    }

    #[test]
    fn test_records_below_two_are_degenerate(
        records in prop::collection::vec(arb_record(), 0..10)
    ) {
        let below: Vec<DimensionRecord> = records
            .into_iter()
            .map(|record| DimensionRecord { k_after: record.k_after % 2, ..record })
            .collect();
        prop_assert!(find_optimal_dimension(&below).unwrap_err().is_degenerate());
    }

    #[test]
    fn test_selected_record_is_acceptable(
        records in prop::collection::vec(arb_record(), 1..10)
    ) {
        if let Ok(best) = select_optimal_dimension(&records, 2) {
            prop_assert!(best.k_after >= 2);
            prop_assert!(records.contains(best));
        }
    }

    #[test]
    fn test_l_diversity_never_exceeds_k(values in prop::collection::vec((0u8..3, 0u8..4), 1..60)) {
        let qid: Vec<String> = values.iter().map(|(q, _)| q.to_string()).collect();
        let sa: Vec<String> = values.iter().map(|(_, s)| s.to_string()).collect();
        let dataset = Dataset::new("x", vec![text_column("q", &qid), text_column("s", &sa)]).unwrap();

        let grouping = QidGrouping::build(&dataset, &["q"]).unwrap();
        let sensitive = dataset.column("s").unwrap();
        for (rows, distinct) in grouping.groups().iter().zip(grouping.distinct_counts(sensitive)) {
            prop_assert!(distinct >= 1 && distinct <= rows.len());
        }
        prop_assert!(l_diversity(&dataset, &["q"], "s").unwrap() <= grouping.groups().iter().map(Vec::len).max().unwrap());
    }

    #[test]
    fn test_paired_patients_end_to_end(pairs in 1usize..20) {
        let original = paired_patients(pairs);
        let rows = original.row_count();
        let qids = ["age", "zip"];

        prop_assert_eq!(k_anonymity(&original, &qids).unwrap(), 2);
        prop_assert_eq!(l_diversity(&original, &qids, "disease").unwrap(), 2);

        let coarse = with_zip(&original, "coarse", "9*");
        let k_after = k_anonymity(&coarse, &qids).unwrap();
        prop_assert_eq!(k_after, rows);
        prop_assert_eq!(privacy_gain(k_after, 2), rows as i64 - 2);
    }
}

#[test]
fn test_session_over_paired_patients() {
    let original = paired_patients(5);
    let suppressed = with_zip(&original, "suppressed", "*");
    let coarse = with_zip(&original, "coarse", "9*");

    let mut session = EvaluationSession::new(
        EvaluatorConfig::default(),
        original,
        &suppressed,
        vec!["zip".to_string()],
        vec!["disease".to_string()],
    )
    .unwrap();

    let measurement = session
        .evaluate(DeidentificationAttempt::new(coarse, ["zip"]))
        .unwrap();
    assert_eq!(measurement.k_before, 2);
    assert_eq!(measurement.k_after, 10);
    assert_eq!(measurement.privacy_gain, 8);
    // Coarse and fully suppressed ZIPs carry the same information
    assert_eq!(measurement.inverse_nue_percentage, 0.0);
    assert!(session.is_complete());

    assert_eq!(session.finish().unwrap().optimal_dimension, 1);
}
