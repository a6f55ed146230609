//! Threshold Calibrator
//!
//! Offline only. Finds the highest threshold whose recall still meets the
//! target: walk cut points from the lowest threshold up and stop at the
//! first one whose recall drops below the target. The early stop relies on
//! recall being non-increasing in the threshold; the curve checks that and
//! the result records it.

use serde::{Deserialize, Serialize};

use crate::constants::FALLBACK_THRESHOLD;
use crate::error::{FraudError, Result};
use super::curve::{CutPoint, LabeledScore, PrecisionRecallCurve};

/// Frozen outcome of one calibration run.
///
/// `achieved_recall` is what the threshold actually attains on the held-out
/// set and is the audit source of truth, not `target_recall`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationResult {
    pub threshold: f64,
    pub target_recall: f64,
    pub achieved_precision: f64,
    pub achieved_recall: f64,
    #[serde(default = "default_true")]
    pub recall_monotone: bool,
    #[serde(default)]
    pub used_fallback: bool,
    #[serde(default)]
    pub cut_points: usize,
}

fn default_true() -> bool {
    true
}

impl CalibrationResult {
    /// A fixed threshold with no calibration evidence behind it
    pub fn fixed(threshold: f64) -> Self {
        Self {
            threshold,
            target_recall: 0.0,
            achieved_precision: 0.0,
            achieved_recall: 0.0,
            recall_monotone: true,
            used_fallback: true,
            cut_points: 0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(FraudError::InvalidProbability(self.threshold));
        }
        Ok(())
    }
}

/// Highest threshold meeting `target_recall`, or `FALLBACK_THRESHOLD`
pub fn calibrate(samples: &[LabeledScore], target_recall: f64) -> Result<CalibrationResult> {
    check_target(target_recall)?;
    let curve = PrecisionRecallCurve::compute(samples)?;
    calibrate_curve(&curve, target_recall)
}

/// Same walk over an already built curve
pub fn calibrate_curve(curve: &PrecisionRecallCurve, target_recall: f64) -> Result<CalibrationResult> {
    check_target(target_recall)?;

    let mut chosen: Option<&CutPoint> = None;
    for point in curve.points() {
        if point.recall < target_recall {
            break;
        }
        chosen = Some(point);
    }

    let (point, used_fallback) = match chosen {
        Some(point) => (*point, false),
        None => {
            log::warn!(
                "No cut point reaches recall {:.4}, falling back to threshold {}",
                target_recall,
                FALLBACK_THRESHOLD
            );
            (curve.at(FALLBACK_THRESHOLD), true)
        }
    };

    let result = CalibrationResult {
        threshold: point.threshold,
        target_recall,
        achieved_precision: point.precision,
        achieved_recall: point.recall,
        recall_monotone: curve.recall_monotone(),
        used_fallback,
        cut_points: curve.points().len(),
    };

    log::info!(
        "Calibrated threshold {:.4} for target recall {:.4}: achieved recall {:.4}, precision {:.4} ({} cut points, {} frauds)",
        result.threshold,
        result.target_recall,
        result.achieved_recall,
        result.achieved_precision,
        result.cut_points,
        curve.positives()
    );

    Ok(result)
}

fn check_target(target_recall: f64) -> Result<()> {
    // NaN fails the comparison too
    if !(target_recall > 0.0 && target_recall <= 1.0) {
        return Err(FraudError::CalibrationInput(format!(
            "target recall {} must be in (0, 1]",
            target_recall
        )));
    }
    Ok(())
}
