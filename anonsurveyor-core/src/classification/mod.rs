//! Column classification by re-identification risk.
//!
//! This module scores every column of a dataset and buckets it:
//! - **Missing-value filter**: drop columns that are mostly missing
//! - **Distinctness weights**: one inverse-frequency weight per row
//! - **Risk rates**: mean weight × 100 per column
//! - **Classification**: QID / sensitive / non-sensitive by α and β
//!
//! # Example
//! ```rust,ignore
//! use anonsurveyor_core::classification::{ColumnClassifier, RiskThresholds};
//!
//! let report = ColumnClassifier::with_defaults().classify(dataset, &["ssn"], None)?;
//! for risk in &report.risk_rates {
//!     println!("{}: {}", risk.column_name, risk.risk_rate);
//! }
//! let report = ColumnClassifier::apply_thresholds(report, RiskThresholds::new(80.0, 20.0)?);
//! ```

mod classifier;
mod config;
mod distinctness;
mod missing;
mod models;

#[cfg(test)]
mod proptests;

// Re-export public API
pub use classifier::{ColumnClassifier, classify_columns};
pub use config::{
    ClassifierConfig, ClassifierConfigError, DEFAULT_MISSING_THRESHOLD_PCT, MissingValueGate,
    RiskThresholds,
};
pub use distinctness::{column_weights, compute_distinct_weights, compute_risk_rates};
pub use missing::{filter_columns_na, missing_percentage};
pub use models::{
    ClassificationReport, ColumnClassification, ColumnRisk, DroppedColumn, RiskCategory,
    sort_by_risk_desc,
};
