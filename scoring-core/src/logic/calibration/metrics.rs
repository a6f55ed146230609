//! Evaluation metrics for the offline run
//!
//! Confusion matrix at the calibrated threshold, ROC-AUC and average
//! precision over the held-out scores.

use serde::{Deserialize, Serialize};

use super::curve::LabeledScore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub true_positives: usize,
}

impl ConfusionMatrix {
    /// Flag when `score >= threshold`
    pub fn at_threshold(samples: &[LabeledScore], threshold: f64) -> Self {
        samples.iter().fold(Self::default(), |mut m, s| {
            match (s.score >= threshold, s.is_fraud) {
                (true, true) => m.true_positives += 1,
                (true, false) => m.false_positives += 1,
                (false, true) => m.false_negatives += 1,
                (false, false) => m.true_negatives += 1,
            }
            m
        })
    }

    pub fn total(&self) -> usize {
        self.true_negatives + self.false_positives + self.false_negatives + self.true_positives
    }

    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    pub fn specificity(&self) -> f64 {
        ratio(self.true_negatives, self.true_negatives + self.false_positives)
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positives + self.true_negatives, self.total())
    }

    pub fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Probability that a random fraud outranks a random legitimate case
/// (ties count half). `None` when either class is absent.
pub fn roc_auc(samples: &[LabeledScore]) -> Option<f64> {
    let positives = samples.iter().filter(|s| s.is_fraud).count();
    let negatives = samples.len() - positives;
    if positives == 0 || negatives == 0 {
        return None;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.score.total_cmp(&b.score));

    // Average ranks over tie groups (1-based)
    let mut positive_rank_sum = 0.0;
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i;
        while j + 1 < sorted.len() && sorted[j + 1].score == sorted[i].score {
            j += 1;
        }
        let average_rank = (i + j) as f64 / 2.0 + 1.0;
        let fraud_in_group = sorted[i..=j].iter().filter(|s| s.is_fraud).count();
        positive_rank_sum += average_rank * fraud_in_group as f64;
        i = j + 1;
    }

    let p = positives as f64;
    let u = positive_rank_sum - p * (p + 1.0) / 2.0;
    Some(u / (p * negatives as f64))
}

/// Step-wise area under the PR curve: `sum (R_n - R_{n-1}) * P_n`
pub fn average_precision(samples: &[LabeledScore]) -> Option<f64> {
    let positives = samples.iter().filter(|s| s.is_fraud).count();
    if positives == 0 {
        return None;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| b.score.total_cmp(&a.score));

    let (mut tp, mut fp) = (0usize, 0usize);
    let mut previous_recall = 0.0;
    let mut ap = 0.0;
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
            let recall = tp as f64 / positives as f64;
            let precision = tp as f64 / (tp + fp) as f64;
            ap += (recall - previous_recall) * precision;
            previous_recall = recall;
        }
    }

    Some(ap)
}

/// Offline evaluation summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub threshold: f64,
    pub confusion: ConfusionMatrix,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub roc_auc: Option<f64>,
    pub average_precision: Option<f64>,
}

pub fn evaluate(samples: &[LabeledScore], threshold: f64) -> EvaluationReport {
    let confusion = ConfusionMatrix::at_threshold(samples, threshold);
    let report = EvaluationReport {
        threshold,
        confusion,
        precision: confusion.precision(),
        recall: confusion.recall(),
        f1: confusion.f1(),
        roc_auc: roc_auc(samples),
        average_precision: average_precision(samples),
    };

    log::info!(
        "Evaluation @ {:.4}: tp={} fp={} fn={} tn={} precision={:.4} recall={:.4} roc_auc={:?} pr_auc={:?}",
        threshold,
        confusion.true_positives,
        confusion.false_positives,
        confusion.false_negatives,
        confusion.true_negatives,
        report.precision,
        report.recall,
        report.roc_auc,
        report.average_precision
    );

    report
}
