//! Decision Policy
//!
//! CHỈ chứa logic quyết định.
//! Input: probability + CalibrationResult
//! Output: ScoreResult

use crate::error::{FraudError, Result};
use crate::logic::calibration::CalibrationResult;
use super::tiers::TierBoundaries;
use super::types::{Label, ScoreResult};

// ============================================================================
// MAIN DECISION FUNCTION
// ============================================================================

/// Label + tier for a probability under the calibrated threshold
pub fn decide(probability: f64, calibration: &CalibrationResult) -> Result<ScoreResult> {
    decide_with_tiers(probability, calibration.threshold, &TierBoundaries::default())
}

/// Decision with a custom tier configuration.
///
/// `probability >= threshold` is fraud: the boundary is inclusive, matching
/// the cut points the calibrator evaluates.
pub fn decide_with_tiers(
    probability: f64,
    threshold: f64,
    tiers: &TierBoundaries,
) -> Result<ScoreResult> {
    if !(0.0..=1.0).contains(&probability) {
        return Err(FraudError::InvalidProbability(probability));
    }
    if !(0.0..=1.0).contains(&threshold) {
        return Err(FraudError::InvalidProbability(threshold));
    }

    let label = if probability >= threshold {
        Label::Fraud
    } else {
        Label::Legitimate
    };

    Ok(ScoreResult::new(probability, label, threshold, tiers.tier(probability)))
}

// ============================================================================
// TESTS
// ============================================================================
