use serde::{Deserialize, Serialize};

use crate::constants::IMPACT_DECIMALS;
use crate::logic::explain::{Attribution, Direction};
use crate::logic::policy::{Label, RiskTier, ScoreResult};

/// One entry of `reasons`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reason {
    pub feature: String,
    pub impact: f64,
    pub direction: Direction,
}

impl From<&Attribution> for Reason {
    fn from(a: &Attribution) -> Self {
        Self {
            feature: a.feature_name.clone(),
            impact: round_impact(a.signed_contribution),
            direction: a.direction,
        }
    }
}

/// Rounded for display only; ranking and direction use the exact value
pub fn round_impact(value: f64) -> f64 {
    let scale = 10f64.powi(IMPACT_DECIMALS);
    let rounded = (value * scale).round() / scale;
    // -0.0 would serialise as "-0.0"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub fraud_probability: f64,
    pub is_fraud: bool,
    pub threshold_used: f64,
    pub risk_level: RiskTier,
    pub reasons: Vec<Reason>,
}

impl PredictionResponse {
    pub fn new(decision: &ScoreResult, attributions: &[Attribution]) -> Self {
        Self {
            fraud_probability: decision.probability(),
            is_fraud: decision.is_fraud(),
            threshold_used: decision.threshold_used(),
            risk_level: decision.tier(),
            reasons: attributions.iter().map(Reason::from).collect(),
        }
    }
}

/// Decision without reasons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub fraud_probability: f64,
    pub is_fraud: bool,
    pub label: Label,
    pub threshold_used: f64,
    pub risk_level: RiskTier,
}

impl From<&ScoreResult> for ScoreResponse {
    fn from(decision: &ScoreResult) -> Self {
        Self {
            fraud_probability: decision.probability(),
            is_fraud: decision.is_fraud(),
            label: decision.label(),
            threshold_used: decision.threshold_used(),
            risk_level: decision.tier(),
        }
    }
}

/// Model metadata for UI / audit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_name: String,
    pub model_family: String,
    pub model_sha256: String,
    pub can_explain: bool,
    pub threshold: f64,
    pub target_recall: f64,
    pub achieved_precision: f64,
    pub achieved_recall: f64,
    pub recall_monotone: bool,
    pub used_fallback: bool,
    pub numerical_cols: Vec<String>,
    pub categorical_cols: Vec<String>,
    pub schema_version: u8,
    pub layout_hash: u32,
    pub n_features: usize,
    pub calibrated_at: i64,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

/// Request counters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ServiceStats {
    pub prediction_count: u64,
    pub error_count: u64,
    pub avg_latency_ms: f64,
}
