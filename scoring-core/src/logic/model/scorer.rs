//! Scorer capability
//!
//! The classifier is opaque: it is reached only through this trait. Model
//! families advertise what they can do via `Capabilities` instead of
//! inheriting from a common base model.

use serde::{Deserialize, Serialize};

use crate::error::{FraudError, Result};

// ============================================================================
// CAPABILITIES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub can_predict: bool,
    pub can_explain: bool,
}

impl Capabilities {
    pub const PREDICT_ONLY: Self = Self {
        can_predict: true,
        can_explain: false,
    };

    pub const EXPLAINABLE: Self = Self {
        can_predict: true,
        can_explain: true,
    };
}

// ============================================================================
// DECOMPOSITION
// ============================================================================

/// Per-column signed contributions in probability space.
///
/// `contributions` sum to `probability - baseline_probability`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decomposition {
    pub probability: f64,
    pub baseline_probability: f64,
    pub contributions: Vec<f64>,
}

impl Decomposition {
    pub fn total(&self) -> f64 {
        self.contributions.iter().sum()
    }

    /// Gap between summed contributions and `probability - baseline`
    pub fn residual(&self) -> f64 {
        (self.total() - (self.probability - self.baseline_probability)).abs()
    }
}

// ============================================================================
// SCORER TRAIT
// ============================================================================

/// Trait cho model families (trees, linear, remote...)
pub trait Scorer: Send + Sync {
    fn name(&self) -> &str;

    fn capabilities(&self) -> Capabilities;

    /// Encoded width the model was trained on
    fn n_features(&self) -> usize;

    /// Fraud probability in [0, 1]
    fn predict_proba(&self, x: &[f64]) -> Result<f64>;

    /// Additive per-column decomposition of `predict_proba(x)`
    fn decompose(&self, _x: &[f64]) -> Result<Decomposition> {
        Err(FraudError::UnsupportedModel(self.name().to_string()))
    }
}

// ============================================================================
// HELPERS
// ============================================================================

pub fn sigmoid(margin: f64) -> f64 {
    if margin >= 0.0 {
        1.0 / (1.0 + (-margin).exp())
    } else {
        let e = margin.exp();
        e / (1.0 + e)
    }
}

pub(crate) fn check_width(name: &str, expected: usize, x: &[f64]) -> Result<()> {
    if x.len() != expected {
        return Err(FraudError::InvalidModel(format!(
            "model `{}` expects {} features, got {}",
            name,
            expected,
            x.len()
        )));
    }
    Ok(())
}

pub(crate) fn check_probability(p: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&p) {
        return Err(FraudError::InvalidProbability(p));
    }
    Ok(p)
}

/// Map margin-space contributions into probability space.
///
/// Every contribution is scaled by the same factor `(p - p0) / (m - m0)`,
/// which keeps signs and ranking and makes the sum equal `p - p0`. When the
/// margins coincide the local slope of the sigmoid is used instead.
pub(crate) fn to_probability_space(
    margin_contributions: Vec<f64>,
    margin: f64,
    baseline_margin: f64,
) -> Decomposition {
    let probability = sigmoid(margin);
    let baseline_probability = sigmoid(baseline_margin);

    let delta = margin - baseline_margin;
    let scale = if delta.abs() > 1e-12 {
        (probability - baseline_probability) / delta
    } else {
        probability * (1.0 - probability)
    };

    Decomposition {
        probability,
        baseline_probability,
        contributions: margin_contributions.into_iter().map(|c| c * scale).collect(),
    }
}

// ============================================================================
// OPAQUE SCORER
// ============================================================================

/// Any prediction function. Predict-only: explanations are refused.
pub struct OpaqueScorer<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    name: String,
    n_features: usize,
    predict: F,
}

impl<F> OpaqueScorer<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    pub fn new(name: impl Into<String>, n_features: usize, predict: F) -> Self {
        Self {
            name: name.into(),
            n_features,
            predict,
        }
    }
}

impl<F> Scorer for OpaqueScorer<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::PREDICT_ONLY
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, x: &[f64]) -> Result<f64> {
        check_width(&self.name, self.n_features, x)?;
        check_probability((self.predict)(x))
    }
}
