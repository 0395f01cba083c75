//! Tabular data source.
//!
//! Parses CSV/TSV files and JSON row arrays into [`Dataset`] snapshots. File
//! reading is left to the caller so that parsing stays synchronous and pure.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AnonSurveyorError, Result};
use crate::models::{Cell, Dataset};

/// Tokens that denote a missing value in delimited text.
const MISSING_TOKENS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetFormat {
    /// Comma separated values with a header row
    Csv,
    /// Tab separated values with a header row
    Tsv,
    /// JSON array of row objects
    Json,
}

impl DatasetFormat {
    /// Detects the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("csv") => Ok(DatasetFormat::Csv),
            Some("tsv") => Ok(DatasetFormat::Tsv),
            Some("json") => Ok(DatasetFormat::Json),
            _ => Err(AnonSurveyorError::invalid_input(format!(
                "cannot detect dataset format of '{}' (expected .csv, .tsv or .json)",
                path.display()
            ))),
        }
    }
}

/// Parses raw bytes into a dataset of the given format.
pub fn parse_dataset(name: &str, bytes: &[u8], format: DatasetFormat) -> Result<Dataset> {
    let dataset = match format {
        DatasetFormat::Csv => parse_delimited(name, bytes, b',')?,
        DatasetFormat::Tsv => parse_delimited(name, bytes, b'\t')?,
        DatasetFormat::Json => parse_json(name, bytes)?,
    };

    tracing::debug!(
        "Parsed dataset '{}': {} rows, {} columns",
        dataset.name(),
        dataset.row_count(),
        dataset.column_count()
    );
    Ok(dataset)
}

/// Parses a single delimited-text field into a cell.
pub fn parse_field(raw: &str) -> Cell {
    let trimmed = raw.trim();
    if MISSING_TOKENS.contains(&trimmed) {
        return Cell::Missing;
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return Cell::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Cell::Bool(false);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Cell::number(value),
        _ => Cell::text(trimmed),
    }
}

fn parse_delimited(name: &str, bytes: &[u8], delimiter: u8) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AnonSurveyorError::data_source(format!("reading header of '{}'", name), e))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            AnonSurveyorError::data_source(format!("reading row {} of '{}'", index + 1, name), e)
        })?;
        rows.push(record.iter().map(parse_field).collect());
    }

    Dataset::from_rows(name, headers, rows)
}

fn json_to_cell(value: Option<&serde_json::Value>) -> Cell {
    match value {
        None | Some(serde_json::Value::Null) => Cell::Missing,
        Some(serde_json::Value::Bool(b)) => Cell::Bool(*b),
        Some(serde_json::Value::Number(n)) => n.as_f64().map_or(Cell::Missing, Cell::number),
        Some(serde_json::Value::String(s)) => Cell::text(s.as_str()),
        Some(nested) => Cell::text(nested.to_string()),
    }
}

fn parse_json(name: &str, bytes: &[u8]) -> Result<Dataset> {
    let rows: Vec<serde_json::Value> =
        serde_json::from_slice(bytes).map_err(|e| AnonSurveyorError::Serialization {
            context: format!("parsing JSON rows of '{}'", name),
            source: e,
        })?;

    // Column names are taken from the first row
    let headers: Vec<String> = match rows.first() {
        Some(serde_json::Value::Object(obj)) => obj.keys().cloned().collect(),
        Some(_) => {
            return Err(AnonSurveyorError::invalid_input(format!(
                "JSON dataset '{}' must be an array of objects",
                name
            )));
        }
        None => Vec::new(),
    };

    let mut cells: Vec<Vec<Cell>> = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let obj = row.as_object().ok_or_else(|| {
            AnonSurveyorError::invalid_input(format!(
                "row {} of JSON dataset '{}' is not an object",
                index + 1,
                name
            ))
        })?;

        let unexpected = obj.keys().filter(|key| !headers.contains(key)).count();
        if unexpected > 0 {
            tracing::warn!(
                "Row {} of '{}' has {} keys not present in the first row; they are ignored",
                index + 1,
                name,
                unexpected
            );
        }

        cells.push(
            headers
                .iter()
                .map(|header| json_to_cell(obj.get(header)))
                .collect(),
        );
    }

    Dataset::from_rows(name, headers, cells)
}
