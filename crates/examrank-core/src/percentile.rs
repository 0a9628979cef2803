//! Percentile rank relative to the calibrated panel.
//!
//! Every call recalibrates from scratch over all rows recorded so far for
//! the test. Stored scores of earlier takers are not recomputed as later
//! takers arrive, so two identical answer sheets can carry different stored
//! percentiles depending on submission order. That staleness is an
//! intentional property of the scoring model, pinned by the test suite, not
//! a caching bug.

use crate::rasch::{calibrate, CalibrationConfig};

/// Ties in ability favor the higher percentile.
const TIE_EPSILON: f64 = 1e-12;

/// Score a fresh correctness row against the rows already recorded for the
/// test (reference panel first, then earlier real takers, in submission
/// order). Returns the new row's percentile in `[0, 100]`.
pub fn percentile_score(
    prior_rows: &[Vec<bool>],
    new_row: &[bool],
    config: &CalibrationConfig,
) -> f64 {
    let mut matrix = Vec::with_capacity(prior_rows.len() + 1);
    matrix.extend(prior_rows.iter().cloned());
    matrix.push(new_row.to_vec());
    percentile_of(&matrix, matrix.len() - 1, config)
}

/// Percentile of one row within a full matrix: the inclusive fraction of
/// abilities at or below the target's, times 100. Empty matrix → 0.
pub fn percentile_of(matrix: &[Vec<bool>], target: usize, config: &CalibrationConfig) -> f64 {
    if matrix.is_empty() {
        return 0.0;
    }
    let calibration = calibrate(matrix, config);
    if calibration.abilities.is_empty() {
        return 0.0;
    }
    let target_ability = calibration.abilities[target];
    let at_or_below = calibration
        .abilities
        .iter()
        .filter(|theta| **theta <= target_ability + TIE_EPSILON)
        .count();
    at_or_below as f64 / calibration.abilities.len() as f64 * 100.0
}
