//! Policy Types
//!
//! Core types cho scoring decisions.
//! KHÔNG chứa logic - chỉ data structures.

use serde::{Deserialize, Serialize};

// ============================================================================
// LABEL
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Fraud,
    Legitimate,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Fraud => "fraud",
            Label::Legitimate => "legitimate",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// RISK TIER
// ============================================================================

/// Coarse human-facing bucket. Serialized as "Low" / "Medium" / "High".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low",
            RiskTier::Medium => "Medium",
            RiskTier::High => "High",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// SCORE RESULT
// ============================================================================

/// Per-request decision. Immutable once produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    probability: f64,
    label: Label,
    threshold_used: f64,
    tier: RiskTier,
}

impl ScoreResult {
    pub(crate) fn new(probability: f64, label: Label, threshold_used: f64, tier: RiskTier) -> Self {
        Self {
            probability,
            label,
            threshold_used,
            tier,
        }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn threshold_used(&self) -> f64 {
        self.threshold_used
    }

    pub fn tier(&self) -> RiskTier {
        self.tier
    }

    pub fn is_fraud(&self) -> bool {
        self.label == Label::Fraud
    }
}
