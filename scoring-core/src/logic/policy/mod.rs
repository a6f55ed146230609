//! Policy Module
//!
//! Applies the calibrated threshold and the fixed risk tiers to a
//! probability. Pure functions, no side effects.
//!
//! ## Structure
//! - `types`: Label, RiskTier, ScoreResult
//! - `tiers`: Tier boundaries
//! - `engine`: Decision logic

pub mod types;
pub mod tiers;
pub mod engine;

// Re-export main types for convenience
pub use types::{Label, RiskTier, ScoreResult};
pub use tiers::TierBoundaries;
pub use engine::{decide, decide_with_tiers};
