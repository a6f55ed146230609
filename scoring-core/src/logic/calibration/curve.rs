//! Precision–recall curve over held-out scores
//!
//! One cut point per distinct score. A transaction is flagged at cut point
//! `t` when `score >= t`, the same closed boundary the decision policy uses.

use serde::{Deserialize, Serialize};

use crate::error::{FraudError, Result};

/// Held-out model score with its ground-truth label
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabeledScore {
    pub score: f64,
    pub is_fraud: bool,
}

impl LabeledScore {
    pub fn new(score: f64, is_fraud: bool) -> Self {
        Self { score, is_fraud }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutPoint {
    pub threshold: f64,
    pub precision: f64,
    pub recall: f64,
    pub true_positives: usize,
    pub false_positives: usize,
}

#[derive(Debug, Clone)]
pub struct PrecisionRecallCurve {
    /// Ascending by threshold
    points: Vec<CutPoint>,
    /// Descending by score
    sorted: Vec<LabeledScore>,
    positives: usize,
    recall_monotone: bool,
}

impl PrecisionRecallCurve {
    /// Validate inputs and build the curve.
    ///
    /// Rejects: empty set, non-finite or out-of-range scores, no fraud cases.
    pub fn compute(samples: &[LabeledScore]) -> Result<Self> {
        if samples.is_empty() {
            return Err(FraudError::CalibrationInput("labelled set is empty".into()));
        }
        if let Some(bad) = samples
            .iter()
            .find(|s| !s.score.is_finite() || !(0.0..=1.0).contains(&s.score))
        {
            return Err(FraudError::CalibrationInput(format!(
                "score {} is not a probability",
                bad.score
            )));
        }

        let positives = samples.iter().filter(|s| s.is_fraud).count();
        if positives == 0 {
            return Err(FraudError::CalibrationInput(
                "labelled set has no fraud cases, recall is undefined".into(),
            ));
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| b.score.total_cmp(&a.score));

        // Walk descending, closing a cut point at the end of each tie group
        let mut points = Vec::new();
        let (mut tp, mut fp) = (0usize, 0usize);
        for (i, sample) in sorted.iter().enumerate() {
            if sample.is_fraud {
                tp += 1;
            } else {
                fp += 1;
            }
            let group_ends = sorted
                .get(i + 1)
                .map_or(true, |next| next.score != sample.score);
            if group_ends {
                points.push(CutPoint {
                    threshold: sample.score,
                    precision: tp as f64 / (tp + fp) as f64,
                    recall: tp as f64 / positives as f64,
                    true_positives: tp,
                    false_positives: fp,
                });
            }
        }
        points.reverse();

        let recall_monotone = points.windows(2).all(|w| w[1].recall <= w[0].recall);
        if !recall_monotone {
            log::warn!("Recall is not monotonically non-increasing over thresholds");
        }

        Ok(Self {
            points,
            sorted,
            positives,
            recall_monotone,
        })
    }

    /// Cut points, lowest threshold first
    pub fn points(&self) -> &[CutPoint] {
        &self.points
    }

    pub fn positives(&self) -> usize {
        self.positives
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    pub fn recall_monotone(&self) -> bool {
        self.recall_monotone
    }

    /// Precision/recall at an arbitrary threshold. Precision is 1.0 when
    /// nothing is flagged.
    pub fn at(&self, threshold: f64) -> CutPoint {
        let (tp, fp) = self
            .sorted
            .iter()
            .take_while(|s| s.score >= threshold)
            .fold((0usize, 0usize), |(tp, fp), s| {
                if s.is_fraud {
                    (tp + 1, fp)
                } else {
                    (tp, fp + 1)
                }
            });

        CutPoint {
            threshold,
            precision: if tp + fp == 0 { 1.0 } else { tp as f64 / (tp + fp) as f64 },
            recall: tp as f64 / self.positives as f64,
            true_positives: tp,
            false_positives: fp,
        }
    }
}

#[cfg(test)]
impl PrecisionRecallCurve {
    /// Curve with hand-picked cut points, skipping the walk in `compute`
    pub(super) fn from_raw(points: Vec<CutPoint>, mut sorted: Vec<LabeledScore>) -> Self {
        sorted.sort_by(|a, b| b.score.total_cmp(&a.score));
        let positives = sorted.iter().filter(|s| s.is_fraud).count();
        let recall_monotone = points.windows(2).all(|w| w[1].recall <= w[0].recall);
        Self {
            points,
            sorted,
            positives,
            recall_monotone,
        }
    }
}
