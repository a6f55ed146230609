use serde::{Deserialize, Serialize};

use crate::logic::calibration::CalibrationResult;
use crate::logic::features::FeatureStats;
use crate::logic::model::ModelArtifact;
use crate::logic::schema::{ColumnLayout, FeatureSchema};

// ============================================================================
// CALIBRATION ARTIFACT
// ============================================================================

/// Everything serving needs besides the model itself.
///
/// The calibration fields sit at the top level of the JSON document, next to
/// the column lists, so older readers that only know `threshold` and the
/// column names keep working.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationArtifact {
    #[serde(flatten)]
    pub calibration: CalibrationResult,

    pub categorical_cols: Vec<String>,
    pub numerical_cols: Vec<String>,

    pub schema: FeatureSchema,
    pub stats: FeatureStats,

    // Fingerprint
    pub schema_version: u8,
    pub layout_hash: u32,
    /// SHA-256 of the serialised model file this threshold was tuned on
    pub model_sha256: String,

    pub created_at: i64, // Unix timestamp
}

impl CalibrationArtifact {
    pub fn new(
        calibration: CalibrationResult,
        schema: FeatureSchema,
        stats: FeatureStats,
        model_sha256: impl Into<String>,
    ) -> Self {
        let layout = ColumnLayout::from_schema(&schema);
        Self {
            calibration,
            categorical_cols: schema.categorical_cols(),
            numerical_cols: schema.numerical_cols(),
            schema_version: layout.version(),
            layout_hash: layout.hash(),
            schema,
            stats,
            model_sha256: model_sha256.into(),
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.calibration.threshold
    }
}

// ============================================================================
// MODEL FILE
// ============================================================================

/// Serialised model plus the layout it was trained against
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFile {
    pub name: String,
    pub schema_version: u8,
    pub layout_hash: u32,
    pub n_features: usize,
    pub model: ModelArtifact,
    pub created_at: i64,
}

impl ModelFile {
    pub fn new(name: impl Into<String>, layout: &ColumnLayout, model: ModelArtifact) -> Self {
        Self {
            name: name.into(),
            schema_version: layout.version(),
            layout_hash: layout.hash(),
            n_features: model.n_features(),
            model,
            created_at: chrono::Utc::now().timestamp(),
        }
    }
}
