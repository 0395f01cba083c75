//! Core data structures and metrics for AnonSurveyor.
//!
//! This crate provides the dataset model, tabular parsing, the column risk
//! classifier and the anonymity evaluator shared by the `anonsurveyor`
//! binary. Every operation is a pure computation over an in-memory dataset
//! snapshot owned by the calling pass.
//!
//! # Privacy Guarantees
//! - Cell values never appear in error messages or log output
//! - Input datasets are never modified; de-identification happens elsewhere
//! - No network access
//!
//! # Architecture
//! - [`classification`]: missing-value filter, distinctness weights, risk
//!   rates and QID/sensitive/non-sensitive buckets
//! - [`anonymity`]: k-anonymity, l-diversity, t-closeness, privacy gain,
//!   non-uniform entropy and optimal dimension selection

pub mod anonymity;
pub mod classification;
pub mod error;
pub mod logging;
pub mod models;
pub mod source;
pub(crate) mod stats;

// Re-export commonly used types
pub use anonymity::{
    DeidentificationAttempt, EvaluationOutcome, EvaluationSession, EvaluatorConfig,
    TClosenessMode,
};
pub use classification::{
    ClassificationReport, ClassifierConfig, ColumnClassifier, MissingValueGate, RiskThresholds,
};
pub use error::{AnonSurveyorError, DegenerateMetric, Result};
pub use logging::init_logging;
pub use models::{AttributeKind, Cell, Column, Dataset};
pub use source::{DatasetFormat, parse_dataset};
