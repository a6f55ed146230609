//! Central Configuration Constants
//!
//! Single source of truth for scoring defaults.

use std::path::PathBuf;

/// Feature schema version
/// MUST be incremented when the encoding rules change
pub const SCHEMA_VERSION: u8 = 1;

/// Number of reasons returned when the caller does not ask for a count
pub const DEFAULT_TOP_K: usize = 5;

/// Threshold used when no cut point reaches the recall target
pub const FALLBACK_THRESHOLD: f64 = 0.5;

/// Recall target used by the offline calibration run
pub const DEFAULT_TARGET_RECALL: f64 = 0.95;

/// Tier boundaries (strictly greater than)
pub const HIGH_TIER_BOUND: f64 = 0.8;
pub const MEDIUM_TIER_BOUND: f64 = 0.4;

/// Max allowed gap between summed contributions and `p - baseline`
pub const ADDITIVITY_TOLERANCE: f64 = 1e-4;

/// Decimals kept for `impact` in responses
pub const IMPACT_DECIMALS: i32 = 4;

/// Contribution magnitudes closer than this rank as ties
pub const RANKING_QUANTUM: f64 = 1e-9;

/// Default artifact file names
pub const DEFAULT_MODEL_FILE: &str = "fraud_model.json";
pub const DEFAULT_CALIBRATION_FILE: &str = "model_metadata.json";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Artifact directory from `FRAUD_ARTIFACT_DIR`, else the local data dir
pub fn get_artifact_dir() -> PathBuf {
    std::env::var("FRAUD_ARTIFACT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("fraud-scoring")
        })
}

/// Recall target from `FRAUD_TARGET_RECALL` or the default
pub fn get_target_recall() -> f64 {
    std::env::var("FRAUD_TARGET_RECALL")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|r: &f64| *r > 0.0 && *r <= 1.0)
        .unwrap_or(DEFAULT_TARGET_RECALL)
}
