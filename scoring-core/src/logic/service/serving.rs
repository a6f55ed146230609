//! Frozen serving artifacts
//!
//! Everything one scoring call needs, loaded once and never mutated:
//! schema + stats (inside the encoder), calibration, scorer.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{FraudError, Result};
use crate::logic::artifacts::{
    load_calibration, load_model, validate_calibration, validate_pairing, CalibrationArtifact,
    ModelFile,
};
use crate::logic::explain::explain;
use crate::logic::features::{Encoder, Transaction};
use crate::logic::model::Scorer;
use crate::logic::policy::{decide, ScoreResult};
use crate::logic::schema::{ColumnLayout, FeatureSchema};
use super::response::{ModelInfo, PredictionResponse};

pub struct ServingArtifacts {
    encoder: Encoder,
    calibration: CalibrationArtifact,
    scorer: Arc<dyn Scorer>,
    model_family: String,
    model_sha256: String,
    loaded_at: chrono::DateTime<chrono::Utc>,
}

impl fmt::Debug for ServingArtifacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServingArtifacts")
            .field("model", &self.scorer.name())
            .field("model_family", &self.model_family)
            .field("model_sha256", &self.model_sha256)
            .field("threshold", &self.calibration.threshold())
            .field("layout_hash", &self.encoder.layout().hash())
            .finish()
    }
}

impl ServingArtifacts {
    /// Load `model_file` and `calibration_file` from `dir` and check they belong together
    pub fn load(dir: &Path, model_file: &str, calibration_file: &str) -> Result<Self> {
        let calibration = load_calibration(&dir.join(calibration_file))?;
        let (model, digest) = load_model(&dir.join(model_file))?;

        let artifacts = Self::from_parts(model, &digest, calibration)?;
        log::info!(
            "Loaded model `{}` ({}) from {}, threshold {:.6}",
            artifacts.scorer.name(),
            artifacts.model_family,
            dir.display(),
            artifacts.calibration.threshold()
        );
        Ok(artifacts)
    }

    /// Build from already-deserialised files
    pub fn from_parts(model: ModelFile, model_sha256: &str, calibration: CalibrationArtifact) -> Result<Self> {
        validate_calibration(&calibration)?;
        let encoder = Encoder::new(calibration.schema.clone(), calibration.stats.clone())?;
        validate_pairing(&model, model_sha256, &calibration, encoder.layout())?;

        let family = model.model.family().to_string();
        let scorer = model.model.into_scorer(&model.name)?;

        Ok(Self {
            encoder,
            calibration,
            scorer,
            model_family: family,
            model_sha256: model_sha256.to_lowercase(),
            loaded_at: chrono::Utc::now(),
        })
    }

    /// Serve a scorer that has no model file (e.g. a predict-only black box).
    ///
    /// The digest binding is skipped; only the width is checked.
    pub fn with_scorer(calibration: CalibrationArtifact, scorer: Arc<dyn Scorer>) -> Result<Self> {
        validate_calibration(&calibration)?;
        let encoder = Encoder::new(calibration.schema.clone(), calibration.stats.clone())?;

        if scorer.n_features() != encoder.layout().width() {
            return Err(FraudError::InvalidModel(format!(
                "model `{}` expects {} features, layout has {} columns",
                scorer.name(),
                scorer.n_features(),
                encoder.layout().width()
            )));
        }

        Ok(Self {
            encoder,
            model_sha256: calibration.model_sha256.clone(),
            calibration,
            scorer,
            model_family: "external".to_string(),
            loaded_at: chrono::Utc::now(),
        })
    }

    pub fn schema(&self) -> &FeatureSchema {
        self.encoder.schema()
    }

    pub fn layout(&self) -> &ColumnLayout {
        self.encoder.layout()
    }

    pub fn calibration(&self) -> &CalibrationArtifact {
        &self.calibration
    }

    pub fn scorer(&self) -> &dyn Scorer {
        self.scorer.as_ref()
    }

    /// Encode → predict → decide
    pub fn score(&self, tx: &Transaction) -> Result<ScoreResult> {
        let vector = self.encoder.encode(tx)?;
        let probability = self.scorer.predict_proba(vector.as_slice())?;
        decide(probability, &self.calibration.calibration)
    }

    /// Decision plus the `top_k` strongest reasons
    pub fn predict(&self, tx: &Transaction, top_k: usize) -> Result<PredictionResponse> {
        let vector = self.encoder.encode(tx)?;
        let probability = self.scorer.predict_proba(vector.as_slice())?;
        let decision = decide(probability, &self.calibration.calibration)?;
        let reasons = explain(&vector, self.scorer.as_ref(), self.encoder.layout(), top_k)?;

        log::debug!(
            "Scored p={:.4} ({}, {}), top reason: {:?}",
            decision.probability(),
            decision.label(),
            decision.tier(),
            reasons.first().map(|r| r.feature_name.as_str())
        );

        Ok(PredictionResponse::new(&decision, &reasons))
    }

    pub fn info(&self) -> ModelInfo {
        let c = &self.calibration;
        ModelInfo {
            model_name: self.scorer.name().to_string(),
            model_family: self.model_family.clone(),
            model_sha256: self.model_sha256.clone(),
            can_explain: self.scorer.capabilities().can_explain,
            threshold: c.calibration.threshold,
            target_recall: c.calibration.target_recall,
            achieved_precision: c.calibration.achieved_precision,
            achieved_recall: c.calibration.achieved_recall,
            recall_monotone: c.calibration.recall_monotone,
            used_fallback: c.calibration.used_fallback,
            numerical_cols: c.numerical_cols.clone(),
            categorical_cols: c.categorical_cols.clone(),
            schema_version: c.schema_version,
            layout_hash: c.layout_hash,
            n_features: self.encoder.layout().width(),
            calibrated_at: c.created_at,
            loaded_at: self.loaded_at,
        }
    }
}
