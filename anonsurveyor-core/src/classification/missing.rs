//! Missing-value filtering ahead of risk scoring.
//!
//! Columns that are mostly missing carry no usable distinctness signal and
//! would otherwise score as low-risk, so they are dropped before scoring.

use crate::error::Result;
use crate::models::{Column, Dataset};

use super::config::{ClassifierConfig, MissingValueGate};
use super::models::DroppedColumn;

/// Percentage of missing cells in a column (0 for an empty column).
pub fn missing_percentage(column: &Column) -> f64 {
    if column.is_empty() {
        return 0.0;
    }
    column.missing_count() as f64 * 100.0 / column.len() as f64
}

/// Drops columns whose missing percentage exceeds the configured threshold.
///
/// With [`MissingValueGate::DatasetWide`] a drop only happens when the
/// dataset contains at least one missing value somewhere; with
/// [`MissingValueGate::PerColumn`] each column is judged on its own.
///
/// Returns the filtered dataset and the dropped columns in dataset order.
pub fn filter_columns_na(
    mut dataset: Dataset,
    config: &ClassifierConfig,
) -> Result<(Dataset, Vec<DroppedColumn>)> {
    let gate_open = match config.missing_gate {
        MissingValueGate::DatasetWide => dataset.contains_missing(),
        MissingValueGate::PerColumn => true,
    };

    if !gate_open {
        return Ok((dataset, Vec::new()));
    }

    let dropped: Vec<DroppedColumn> = dataset
        .columns()
        .iter()
        .filter_map(|column| {
            let percentage = missing_percentage(column);
            (percentage > config.missing_threshold_pct).then(|| DroppedColumn {
                column_name: column.name().to_string(),
                missing_count: column.missing_count() as u64,
                missing_percentage: percentage,
            })
        })
        .collect();

    for column in &dropped {
        tracing::info!(
            "Column '{}' excluded because of missing values: {:.2}%",
            column.column_name,
            column.missing_percentage
        );
    }

    let names: Vec<&str> = dropped.iter().map(|c| c.column_name.as_str()).collect();
    dataset.drop_columns(&names)?;

    Ok((dataset, dropped))
}
