//! Anonymity evaluation of de-identification attempts.
//!
//! Given an original dataset, its fully suppressed counterpart and a
//! sequence of progressively de-identified snapshots, this module measures:
//! - **k-anonymity**: smallest QID group
//! - **l-diversity**: fewest distinct sensitive values in a group
//! - **t-closeness**: largest distance between a group's sensitive
//!   distribution and the whole dataset's
//! - **Privacy gain**: change in k-anonymity
//! - **Non-uniform entropy**: utility lost to generalization
//!
//! and selects the number of QIDs worth de-identifying.
//!
//! # Example
//! ```rust,ignore
//! use anonsurveyor_core::anonymity::{DeidentificationAttempt, EvaluationSession, EvaluatorConfig};
//!
//! let mut session = EvaluationSession::new(EvaluatorConfig::default(), original, &suppressed, qids, sas)?;
//! session.evaluate(DeidentificationAttempt::new(zip_generalized, ["zip"]))?;
//! session.evaluate(DeidentificationAttempt::new(both_generalized, ["zip", "age"]))?;
//! println!("{}", session.finish()?.advice());
//! ```

mod config;
mod dimension;
mod entropy;
mod evaluator;
mod grouping;
mod models;
mod t_closeness;

#[cfg(test)]
mod proptests;

// Re-export public API
pub use config::{DEFAULT_MIN_K_ANONYMITY, EvaluatorConfig, EvaluatorConfigError, TClosenessMode};
pub use dimension::{DimensionRecord, find_optimal_dimension, privacy_gain, select_optimal_dimension};
pub use entropy::{EntropyBounds, non_uniform_entropy, normalize_entropy};
pub use evaluator::{EvaluationSession, SnapshotProfile};
pub use grouping::{QidGrouping, k_anonymity, l_diversity};
pub use models::{
    AnonymityBaseline, AttemptMeasurement, AttributeDiversity, DeidentificationAttempt,
    EvaluationOutcome, SensitiveDiversity,
};
pub use t_closeness::{
    DistributionDistance, OrderedDistance, VariationDistance, attribute_t_closeness,
    distance_for, t_closeness,
};
