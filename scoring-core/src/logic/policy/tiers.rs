//! Risk Tier Configuration
//!
//! Tiers communicate raw risk magnitude to human review queues. They are
//! independent of the calibrated threshold: a `legitimate` transaction can
//! still sit in the `Medium` tier.

use serde::{Deserialize, Serialize};

use crate::constants::{HIGH_TIER_BOUND, MEDIUM_TIER_BOUND};
use super::types::RiskTier;

/// Tier boundaries (strictly greater than)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierBoundaries {
    pub high: f64,
    pub medium: f64,
}

impl Default for TierBoundaries {
    fn default() -> Self {
        Self {
            high: HIGH_TIER_BOUND,
            medium: MEDIUM_TIER_BOUND,
        }
    }
}

impl TierBoundaries {
    pub fn tier(&self, probability: f64) -> RiskTier {
        if probability > self.high {
            RiskTier::High
        } else if probability > self.medium {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_boundaries() {
        let tiers = TierBoundaries::default();
        assert_eq!(tiers.high, 0.8);
        assert_eq!(tiers.medium, 0.4);
    }

    #[test]
    fn test_boundaries_are_exclusive() {
        let tiers = TierBoundaries::default();
        assert_eq!(tiers.tier(0.8), RiskTier::Medium);
        assert_eq!(tiers.tier(0.8000001), RiskTier::High);
        assert_eq!(tiers.tier(0.4), RiskTier::Low);
        assert_eq!(tiers.tier(0.41), RiskTier::Medium);
        assert_eq!(tiers.tier(0.0), RiskTier::Low);
        assert_eq!(tiers.tier(1.0), RiskTier::High);
    }
}
