//! QID grouping, k-anonymity and l-diversity.
//!
//! Rows sharing identical values across the QID columns form one group
//! (equivalence class). Missing cells group like any other value.

use std::collections::{HashMap, HashSet};

use crate::error::{AnonSurveyorError, Result};
use crate::models::{Cell, Column, Dataset};

/// Partition of a dataset's rows by their QID values.
///
/// Groups keep first-appearance order; row indices inside a group are
/// ascending. Building the grouping once per snapshot lets k-anonymity,
/// l-diversity and t-closeness share it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QidGrouping {
    columns: Vec<String>,
    groups: Vec<Vec<usize>>,
}

impl QidGrouping {
    /// Groups the rows of `dataset` by the given columns.
    ///
    /// # Errors
    /// Empty column list, empty dataset, or unknown column names.
    pub fn build<S: AsRef<str>>(dataset: &Dataset, columns: &[S]) -> Result<Self> {
        if columns.is_empty() {
            return Err(AnonSurveyorError::invalid_input(
                "at least one quasi-identifier is required for grouping",
            ));
        }
        if dataset.is_empty() {
            return Err(AnonSurveyorError::invalid_input(format!(
                "dataset '{}' has no rows to group",
                dataset.name()
            )));
        }

        let resolved: Vec<&Column> = dataset.resolve_columns(columns)?;

        let mut index: HashMap<Vec<&Cell>, usize> = HashMap::new();
        let mut groups: Vec<Vec<usize>> = Vec::new();

        for row in 0..dataset.row_count() {
            let key: Vec<&Cell> = resolved.iter().map(|column| &column.cells()[row]).collect();
            let slot = *index.entry(key).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push(row);
        }

        tracing::trace!(
            "Grouped {} rows of '{}' into {} groups",
            dataset.row_count(),
            dataset.name(),
            groups.len()
        );

        Ok(Self {
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            groups,
        })
    }

    /// Columns the grouping was built on.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Row indices of every group.
    pub fn groups(&self) -> &[Vec<usize>] {
        &self.groups
    }

    /// Number of groups.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Smallest group size (k-anonymity).
    pub fn min_group_size(&self) -> usize {
        self.groups.iter().map(Vec::len).min().unwrap_or(0)
    }

    /// Distinct values of `column` inside each group.
    pub fn distinct_counts(&self, column: &Column) -> Vec<usize> {
        self.groups
            .iter()
            .map(|rows| {
                rows.iter()
                    .map(|&row| &column.cells()[row])
                    .collect::<HashSet<&Cell>>()
                    .len()
            })
            .collect()
    }

    /// Smallest number of distinct `column` values in any group (l-diversity).
    pub fn min_distinct(&self, column: &Column) -> usize {
        self.distinct_counts(column).into_iter().min().unwrap_or(0)
    }
}

/// Minimum group size when grouping by the QIDs.
pub fn k_anonymity<S: AsRef<str>>(dataset: &Dataset, qids: &[S]) -> Result<usize> {
    Ok(QidGrouping::build(dataset, qids)?.min_group_size())
}

/// Minimum number of distinct sensitive values in any QID group.
pub fn l_diversity<S: AsRef<str>>(
    dataset: &Dataset,
    qids: &[S],
    sensitive_attribute: &str,
) -> Result<usize> {
    let sensitive = dataset.column(sensitive_attribute)?;
    Ok(QidGrouping::build(dataset, qids)?.min_distinct(sensitive))
}
