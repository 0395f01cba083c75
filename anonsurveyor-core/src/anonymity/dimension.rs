//! Privacy gain and optimal QID dimension selection.

use serde::{Deserialize, Serialize};

use crate::error::{DegenerateMetric, Result};

use super::config::DEFAULT_MIN_K_ANONYMITY;

/// One measured de-identification attempt, reduced to what dimension
/// selection needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionRecord {
    /// `k_after − k_before`
    pub privacy_gain: i64,
    /// Utility retained, `100 − normalized NUE`
    pub inverse_nue: f64,
    /// k-anonymity of the de-identified snapshot
    pub k_after: usize,
    /// Number of QIDs de-identified in this attempt
    pub dimension: usize,
}

impl DimensionRecord {
    /// Distance between privacy gain and retained utility; smaller is more
    /// balanced.
    pub fn balance(&self) -> f64 {
        (self.privacy_gain as f64 - self.inverse_nue).abs()
    }

    fn dominates(&self, other: &Self, min_k: usize) -> bool {
        self.privacy_gain >= other.privacy_gain
            && self.inverse_nue >= other.inverse_nue
            && self.k_after >= min_k
    }
}

/// Increase in minimum group size. Negative when anonymity got worse.
pub fn privacy_gain(k_after: usize, k_before: usize) -> i64 {
    k_after as i64 - k_before as i64
}

/// Picks the best record among those reaching `min_k`.
///
/// The first acceptable record starts as the best; a later record replaces
/// it only when it is at least as good on both privacy gain and retained
/// utility and strictly better balanced.
///
/// # Errors
/// [`DegenerateMetric::NoAcceptableDimension`] when no record reaches `min_k`.
pub fn select_optimal_dimension(
    records: &[DimensionRecord],
    min_k: usize,
) -> Result<&DimensionRecord> {
    let mut acceptable = records.iter().filter(|record| record.k_after >= min_k);

    let mut best = acceptable
        .next()
        .ok_or(DegenerateMetric::NoAcceptableDimension { min_k })?;

    for candidate in acceptable {
        if candidate.dominates(best, min_k) && candidate.balance() < best.balance() {
            tracing::trace!(
                "Dimension {} replaces {} (balance {} < {})",
                candidate.dimension,
                best.dimension,
                candidate.balance(),
                best.balance()
            );
            best = candidate;
        }
    }

    Ok(best)
}

/// Optimal dimension with the default acceptance of k ≥ 2.
pub fn find_optimal_dimension(records: &[DimensionRecord]) -> Result<usize> {
    select_optimal_dimension(records, DEFAULT_MIN_K_ANONYMITY).map(|record| record.dimension)
}
