//! Logistic regression
//!
//! `margin = bias + w · x`. Contributions are measured against a reference
//! point (the training mean of each encoded column): `w_i * (x_i - ref_i)`.

use serde::{Deserialize, Serialize};

use crate::error::{FraudError, Result};
use super::scorer::{check_width, sigmoid, to_probability_space, Capabilities, Decomposition, Scorer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub weights: Vec<f64>,
    pub bias: f64,
    /// Baseline input; empty means the origin
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reference: Vec<f64>,
}

/// Batch gradient descent settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitConfig {
    pub learning_rate: f64,
    pub epochs: usize,
    pub l2: f64,
    /// Weight of fraud samples relative to legitimate ones
    pub positive_weight: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.5,
            epochs: 500,
            l2: 1e-4,
            positive_weight: 10.0,
        }
    }
}

impl LogisticModel {
    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    pub fn validate(&self) -> Result<()> {
        if self.weights.is_empty() {
            return Err(FraudError::InvalidModel("logistic model has no weights".into()));
        }
        if !self.reference.is_empty() && self.reference.len() != self.weights.len() {
            return Err(FraudError::InvalidModel(format!(
                "reference has {} values, model has {} weights",
                self.reference.len(),
                self.weights.len()
            )));
        }
        let finite = self.bias.is_finite()
            && self.weights.iter().all(|w| w.is_finite())
            && self.reference.iter().all(|r| r.is_finite());
        if !finite {
            return Err(FraudError::InvalidModel("logistic model has non-finite values".into()));
        }
        Ok(())
    }

    pub fn margin(&self, x: &[f64]) -> f64 {
        self.bias + self.weights.iter().zip(x).map(|(w, v)| w * v).sum::<f64>()
    }

    fn reference_at(&self, i: usize) -> f64 {
        self.reference.get(i).copied().unwrap_or(0.0)
    }

    /// Deterministic full-batch gradient descent from zero weights.
    ///
    /// The reference point is set to the column means of `x`.
    pub fn fit(x: &[Vec<f64>], y: &[bool], config: &FitConfig) -> Result<Self> {
        if x.is_empty() || x.len() != y.len() {
            return Err(FraudError::CalibrationInput(format!(
                "need matching non-empty inputs, got {} rows and {} labels",
                x.len(),
                y.len()
            )));
        }
        let width = x[0].len();
        if width == 0 || x.iter().any(|row| row.len() != width) {
            return Err(FraudError::CalibrationInput("rows have inconsistent width".into()));
        }
        if !y.iter().any(|&label| label) || y.iter().all(|&label| label) {
            return Err(FraudError::CalibrationInput(
                "training labels must contain both classes".into(),
            ));
        }

        let sample_weight = |label: bool| if label { config.positive_weight } else { 1.0 };
        let total_weight: f64 = y.iter().map(|&label| sample_weight(label)).sum();

        let mut weights = vec![0.0; width];
        let mut bias = 0.0;

        for _ in 0..config.epochs {
            let mut grad_w = vec![0.0; width];
            let mut grad_b = 0.0;

            for (row, &label) in x.iter().zip(y) {
                let margin = bias + weights.iter().zip(row).map(|(w, v)| w * v).sum::<f64>();
                let target = if label { 1.0 } else { 0.0 };
                let err = sample_weight(label) * (sigmoid(margin) - target);
                for (g, v) in grad_w.iter_mut().zip(row) {
                    *g += err * v;
                }
                grad_b += err;
            }

            for (w, g) in weights.iter_mut().zip(&grad_w) {
                *w -= config.learning_rate * (g / total_weight + config.l2 * *w);
            }
            bias -= config.learning_rate * grad_b / total_weight;
        }

        let n = x.len() as f64;
        let reference = (0..width)
            .map(|j| x.iter().map(|row| row[j]).sum::<f64>() / n)
            .collect();

        let model = Self {
            weights,
            bias,
            reference,
        };
        model.validate()?;

        log::info!(
            "Fitted logistic model on {} rows x {} columns ({} epochs)",
            x.len(),
            width,
            config.epochs
        );

        Ok(model)
    }
}

#[derive(Debug, Clone)]
pub struct LogisticScorer {
    name: String,
    model: LogisticModel,
}

impl LogisticScorer {
    pub fn new(name: impl Into<String>, model: LogisticModel) -> Result<Self> {
        model.validate()?;
        Ok(Self {
            name: name.into(),
            model,
        })
    }

    pub fn model(&self) -> &LogisticModel {
        &self.model
    }
}

impl Scorer for LogisticScorer {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::EXPLAINABLE
    }

    fn n_features(&self) -> usize {
        self.model.n_features()
    }

    fn predict_proba(&self, x: &[f64]) -> Result<f64> {
        check_width(&self.name, self.model.n_features(), x)?;
        Ok(sigmoid(self.model.margin(x)))
    }

    fn decompose(&self, x: &[f64]) -> Result<Decomposition> {
        check_width(&self.name, self.model.n_features(), x)?;

        let contributions: Vec<f64> = self
            .model
            .weights
            .iter()
            .zip(x)
            .enumerate()
            .map(|(i, (w, v))| w * (v - self.model.reference_at(i)))
            .collect();

        let baseline_margin = self.model.bias
            + self
                .model
                .weights
                .iter()
                .enumerate()
                .map(|(i, w)| w * self.model.reference_at(i))
                .sum::<f64>();

        Ok(to_probability_space(contributions, self.model.margin(x), baseline_margin))
    }
}
