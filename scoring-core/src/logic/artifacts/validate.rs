use crate::error::{FraudError, Result, SchemaError};
use crate::logic::schema::ColumnLayout;
use super::types::{CalibrationArtifact, ModelFile};

/// Check a loaded calibration artifact is self-consistent.
///
/// Recomputes the layout from the stored schema; the stored fingerprint has
/// to match it. Returns the recomputed layout.
pub fn validate_calibration(artifact: &CalibrationArtifact) -> Result<ColumnLayout> {
    artifact.schema.validate()?;

    let layout = ColumnLayout::from_schema(&artifact.schema);
    layout.validate(artifact.schema_version, artifact.layout_hash)?;

    if artifact.numerical_cols != artifact.schema.numerical_cols()
        || artifact.categorical_cols != artifact.schema.categorical_cols()
    {
        return Err(SchemaError::Invalid(
            "column lists disagree with the stored schema".into(),
        )
        .into());
    }

    artifact.stats.validate(&artifact.schema)?;
    artifact.calibration.validate()?;

    if artifact.model_sha256.len() != 64 || hex::decode(&artifact.model_sha256).is_err() {
        return Err(FraudError::InvalidModel(format!(
            "model_sha256 `{}` is not a SHA-256 hex digest",
            artifact.model_sha256
        )));
    }

    Ok(layout)
}

/// Check a model file belongs with a calibration artifact.
///
/// `model_sha256` is the digest of the model file bytes as read from disk.
pub fn validate_pairing(
    model: &ModelFile,
    model_sha256: &str,
    artifact: &CalibrationArtifact,
    layout: &ColumnLayout,
) -> Result<()> {
    model.model.validate()?;
    layout.validate(model.schema_version, model.layout_hash)?;

    if model.n_features != layout.width() || model.model.n_features() != layout.width() {
        return Err(FraudError::InvalidModel(format!(
            "model `{}` expects {} features, layout has {} columns",
            model.name,
            model.model.n_features(),
            layout.width()
        )));
    }

    if !model_sha256.eq_ignore_ascii_case(&artifact.model_sha256) {
        return Err(FraudError::InvalidModel(format!(
            "calibration was frozen for model {}, found {}",
            artifact.model_sha256, model_sha256
        )));
    }

    Ok(())
}
