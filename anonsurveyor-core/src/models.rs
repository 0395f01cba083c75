//! Tabular data model shared by the classifier and the anonymity evaluator.
//!
//! A [`Dataset`] is an ordered set of named, equally long columns. Cells carry
//! a reserved [`Cell::Missing`] sentinel so that missing values take part in
//! counting and grouping like any other value.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::{AnonSurveyorError, Result};

/// A single cell value.
#[derive(Debug, Clone)]
pub enum Cell {
    /// Reserved sentinel for absent values
    Missing,
    /// Boolean value
    Bool(bool),
    /// Numeric value (integers are stored as floats)
    Number(f64),
    /// Free text or categorical value
    Text(String),
}

impl Cell {
    /// Creates a numeric cell, mapping NaN to [`Cell::Missing`].
    pub fn number(value: f64) -> Self {
        if value.is_nan() {
            Cell::Missing
        } else {
            Cell::Number(value)
        }
    }

    /// Creates a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Returns true for the missing sentinel.
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    fn rank(&self) -> u8 {
        match self {
            Cell::Missing => 0,
            Cell::Bool(_) => 1,
            Cell::Number(_) => 2,
            Cell::Text(_) => 3,
        }
    }
}

/// Folds `-0.0` into `0.0` so equal numbers hash equally.
fn canonical(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Cell::Missing => {}
            Cell::Bool(b) => b.hash(state),
            Cell::Number(n) => canonical(*n).to_bits().hash(state),
            Cell::Text(s) => s.hash(state),
        }
    }
}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Cell::Bool(a), Cell::Bool(b)) => a.cmp(b),
            (Cell::Number(a), Cell::Number(b)) => canonical(*a).total_cmp(&canonical(*b)),
            (Cell::Text(a), Cell::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Value type of a column, as seen by distance metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    /// Every present value is a number
    Numeric,
    /// Text values, possibly mixed with other types, or no present values
    Categorical,
    /// Every present value is a boolean
    Boolean,
}

impl AttributeKind {
    /// Returns the lowercase name of this kind.
    pub fn name(&self) -> &'static str {
        match self {
            AttributeKind::Numeric => "numeric",
            AttributeKind::Categorical => "categorical",
            AttributeKind::Boolean => "boolean",
        }
    }
}

/// A named column of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    cells: Vec<Cell>,
}

impl Column {
    /// Creates a new column.
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cells in row order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Counts cells holding the missing sentinel.
    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_missing()).count()
    }

    /// Builds the distinct value → occurrence count table.
    pub fn value_counts(&self) -> HashMap<&Cell, usize> {
        let mut counts: HashMap<&Cell, usize> = HashMap::new();
        for cell in &self.cells {
            *counts.entry(cell).or_insert(0) += 1;
        }
        counts
    }

    /// Infers the attribute kind from the present (non-missing) values.
    pub fn attribute_kind(&self) -> AttributeKind {
        let mut has_text = false;
        let mut has_number = false;
        let mut has_bool = false;

        for cell in &self.cells {
            match cell {
                Cell::Missing => {}
                Cell::Bool(_) => has_bool = true,
                Cell::Number(_) => has_number = true,
                Cell::Text(_) => has_text = true,
            }
        }

        match (has_text, has_number, has_bool) {
            (false, true, false) => AttributeKind::Numeric,
            (false, false, true) => AttributeKind::Boolean,
            _ => AttributeKind::Categorical,
        }
    }
}

/// A rectangular dataset snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    name: String,
    columns: Vec<Column>,
    row_count: usize,
}

impl Dataset {
    /// Creates a dataset, validating unique column names and equal lengths.
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Result<Self> {
        let name = name.into();
        let row_count = columns.first().map_or(0, Column::len);

        let mut seen: HashSet<&str> = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(AnonSurveyorError::invalid_input(format!(
                    "duplicate column '{}' in dataset '{}'",
                    column.name(),
                    name
                )));
            }
            if column.len() != row_count {
                return Err(AnonSurveyorError::RaggedDataset {
                    column: column.name().to_string(),
                    expected: row_count,
                    actual: column.len(),
                });
            }
        }

        Ok(Self {
            name,
            columns,
            row_count,
        })
    }

    /// Creates a dataset from a header and row-major cells.
    ///
    /// Every row must have exactly one cell per header entry.
    pub fn from_rows(
        name: impl Into<String>,
        headers: Vec<String>,
        rows: Vec<Vec<Cell>>,
    ) -> Result<Self> {
        let mut columns: Vec<Vec<Cell>> = headers
            .iter()
            .map(|_| Vec::with_capacity(rows.len()))
            .collect();

        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != headers.len() {
                return Err(AnonSurveyorError::invalid_input(format!(
                    "row {} has {} cells, expected {}",
                    index + 1,
                    row.len(),
                    headers.len()
                )));
            }
            for (column, cell) in columns.iter_mut().zip(row) {
                column.push(cell);
            }
        }

        let columns = headers
            .into_iter()
            .zip(columns)
            .map(|(header, cells)| Column::new(header, cells))
            .collect();

        Self::new(name, columns)
    }

    /// Dataset name, used in error messages and reports.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Columns in declaration order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Returns true if a column with this name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|column| column.name() == name)
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|column| column.name() == name)
            .ok_or_else(|| AnonSurveyorError::unknown_column(name, &self.name))
    }

    /// Resolves a list of column names, failing on the first unknown name.
    pub fn resolve_columns<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<&Column>> {
        names
            .iter()
            .map(|name| self.column(name.as_ref()))
            .collect()
    }

    /// Returns true if any cell anywhere holds the missing sentinel.
    pub fn contains_missing(&self) -> bool {
        self.columns
            .iter()
            .any(|column| column.cells().iter().any(Cell::is_missing))
    }

    /// Removes the named columns.
    ///
    /// All names are validated before anything is removed, so an unknown
    /// name leaves the dataset untouched.
    pub fn drop_columns<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        for name in names {
            if !self.has_column(name.as_ref()) {
                return Err(AnonSurveyorError::unknown_column(
                    name.as_ref(),
                    &self.name,
                ));
            }
        }

        self.columns
            .retain(|column| !names.iter().any(|name| name.as_ref() == column.name()));
        if self.columns.is_empty() {
            self.row_count = 0;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(values: &[f64]) -> Vec<Cell> {
        values.iter().copied().map(Cell::number).collect()
    }

    fn texts(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|v| Cell::text(*v)).collect()
    }

    #[test]
    fn test_cell_number_nan_is_missing() {
        assert!(Cell::number(f64::NAN).is_missing());
        assert!(!Cell::number(1.0).is_missing());
    }

    #[test]
    fn test_cell_negative_zero_equals_zero() {
        let mut counts: HashMap<Cell, usize> = HashMap::new();
        *counts.entry(Cell::Number(0.0)).or_insert(0) += 1;
        *counts.entry(Cell::Number(-0.0)).or_insert(0) += 1;
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[&Cell::Number(0.0)], 2);
    }

    #[test]
    fn test_cell_ordering() {
        let mut cells = vec![
            Cell::text("b"),
            Cell::Number(10.0),
            Cell::Missing,
            Cell::Number(2.0),
            Cell::Bool(true),
            Cell::text("a"),
        ];
        cells.sort();
        assert_eq!(
            cells,
            vec![
                Cell::Missing,
                Cell::Bool(true),
                Cell::Number(2.0),
                Cell::Number(10.0),
                Cell::text("a"),
                Cell::text("b"),
            ]
        );
    }

    #[test]
    fn test_cell_number_and_text_differ() {
        assert_ne!(Cell::Number(1.0), Cell::text("1"));
    }

    #[test]
    fn test_column_value_counts() {
        let column = Column::new("city", texts(&["Gent", "Gent", "Brugge"]));
        let counts = column.value_counts();
        assert_eq!(counts[&Cell::text("Gent")], 2);
        assert_eq!(counts[&Cell::text("Brugge")], 1);
    }

    #[test]
    fn test_column_missing_count() {
        let column = Column::new("age", vec![Cell::Missing, Cell::Number(3.0), Cell::Missing]);
        assert_eq!(column.missing_count(), 2);
    }

    #[test]
    fn test_attribute_kind_inference() {
        let numeric = Column::new("a", vec![Cell::Number(1.0), Cell::Missing]);
        assert_eq!(numeric.attribute_kind(), AttributeKind::Numeric);

        let text = Column::new("b", texts(&["x", "y"]));
        assert_eq!(text.attribute_kind(), AttributeKind::Categorical);

        let mixed = Column::new("c", vec![Cell::Number(1.0), Cell::text("x")]);
        assert_eq!(mixed.attribute_kind(), AttributeKind::Categorical);

        let boolean = Column::new("d", vec![Cell::Bool(true), Cell::Missing]);
        assert_eq!(boolean.attribute_kind(), AttributeKind::Boolean);

        let empty = Column::new("e", vec![Cell::Missing]);
        assert_eq!(empty.attribute_kind(), AttributeKind::Categorical);
    }

    #[test]
    fn test_dataset_rejects_ragged_columns() {
        let result = Dataset::new(
            "ragged",
            vec![
                Column::new("a", numbers(&[1.0, 2.0])),
                Column::new("b", numbers(&[1.0])),
            ],
        );
        assert!(matches!(
            result,
            Err(AnonSurveyorError::RaggedDataset {
                expected: 2,
                actual: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_dataset_rejects_duplicate_columns() {
        let result = Dataset::new(
            "dup",
            vec![
                Column::new("a", numbers(&[1.0])),
                Column::new("a", numbers(&[2.0])),
            ],
        );
        assert!(matches!(result, Err(AnonSurveyorError::InvalidInput { .. })));
    }

    #[test]
    fn test_dataset_from_rows() {
        let dataset = Dataset::from_rows(
            "people",
            vec!["name".to_string(), "age".to_string()],
            vec![
                vec![Cell::text("Ann"), Cell::Number(30.0)],
                vec![Cell::text("Bob"), Cell::Missing],
            ],
        )
        .unwrap();

        assert_eq!(dataset.row_count(), 2);
        assert_eq!(dataset.column_names(), vec!["name", "age"]);
        assert_eq!(dataset.column("age").unwrap().missing_count(), 1);
        assert!(dataset.contains_missing());
    }

    #[test]
    fn test_dataset_from_rows_rejects_short_row() {
        let result = Dataset::from_rows(
            "people",
            vec!["name".to_string(), "age".to_string()],
            vec![vec![Cell::text("Ann")]],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_dataset_unknown_column() {
        let dataset = Dataset::new("t", vec![Column::new("a", numbers(&[1.0]))]).unwrap();
        let err = dataset.column("zip").unwrap_err();
        assert!(matches!(err, AnonSurveyorError::UnknownColumn { .. }));
        assert!(dataset.resolve_columns(&["a", "zip"]).is_err());
        assert_eq!(dataset.resolve_columns(&["a"]).unwrap().len(), 1);
    }

    #[test]
    fn test_drop_columns_is_all_or_nothing() {
        let mut dataset = Dataset::new(
            "t",
            vec![
                Column::new("ssn", texts(&["1", "2"])),
                Column::new("age", numbers(&[30.0, 40.0])),
            ],
        )
        .unwrap();

        assert!(dataset.drop_columns(&["ssn", "unknown"]).is_err());
        assert_eq!(dataset.column_count(), 2);

        dataset.drop_columns(&["ssn"]).unwrap();
        assert_eq!(dataset.column_names(), vec!["age"]);
        assert_eq!(dataset.row_count(), 2);
    }

    #[test]
    fn test_empty_dataset() {
        let dataset = Dataset::new("empty", vec![]).unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.column_count(), 0);
        assert!(!dataset.contains_missing());
    }
}
