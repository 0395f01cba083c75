//! Error types for risk scoring and anonymity evaluation.
//!
//! Every error is scoped to a single classification or evaluation pass.
//! Nothing in the core terminates the process; callers decide whether to
//! re-supply a column list, a threshold, or a dataset.
//!
//! Error messages name columns and datasets but never include cell values.

use thiserror::Error;

/// Main error type for AnonSurveyor operations.
#[derive(Debug, Error)]
pub enum AnonSurveyorError {
    /// Generic input validation failure (empty lists, empty datasets, bad config)
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// A referenced column does not exist in the dataset
    #[error("Unknown column '{column}' in dataset '{dataset}'")]
    UnknownColumn { column: String, dataset: String },

    /// Columns of one dataset have different lengths
    #[error("Ragged dataset: column '{column}' has {actual} rows, expected {expected}")]
    RaggedDataset {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Classification thresholds violate β ≤ α or are not finite
    #[error("Invalid thresholds: beta ({beta}) must be finite and not exceed alpha ({alpha})")]
    InvalidThresholds { alpha: f64, beta: f64 },

    /// A metric could not be computed because its inputs are degenerate
    #[error("Degenerate metric: {0}")]
    Degenerate(#[from] DegenerateMetric),

    /// Tabular data could not be parsed
    #[error("Data source error: {context}")]
    DataSource {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// I/O operation failed
    #[error("I/O operation failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization or deserialization failed
    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Named degenerate-metric conditions.
///
/// These are kept apart from generic failures so a session driver can react,
/// for example by asking for a different de-identification attempt.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DegenerateMetric {
    /// Entropy bounds are equal, so normalization would divide by zero
    #[error("entropy range is empty (min == max == {value})")]
    ZeroEntropyRange { value: f64 },

    /// No de-identification attempt reached the minimum k-anonymity
    #[error("no acceptable de-identification achieved k-anonymity >= {min_k}")]
    NoAcceptableDimension { min_k: usize },
}

/// Convenience type alias for Results with AnonSurveyorError
pub type Result<T> = std::result::Result<T, AnonSurveyorError>;

impl AnonSurveyorError {
    /// Creates an input validation error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates an unknown column error
    pub fn unknown_column(column: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self::UnknownColumn {
            column: column.into(),
            dataset: dataset.into(),
        }
    }

    /// Creates a data source error with context
    pub fn data_source<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::DataSource {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Returns true for input validation errors.
    pub fn is_input_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. }
                | Self::UnknownColumn { .. }
                | Self::RaggedDataset { .. }
                | Self::InvalidThresholds { .. }
        )
    }

    /// Returns true for degenerate-metric conditions.
    pub fn is_degenerate(&self) -> bool {
        matches!(self, Self::Degenerate(_))
    }

    /// Returns the degenerate-metric condition, if this is one.
    pub fn as_degenerate(&self) -> Option<&DegenerateMetric> {
        match self {
            Self::Degenerate(condition) => Some(condition),
            _ => None,
        }
    }
}
