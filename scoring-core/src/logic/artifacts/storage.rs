use std::fs;
use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::{FraudError, Result};
use super::types::{CalibrationArtifact, ModelFile};
use super::validate::validate_calibration;

/// Lowercase hex SHA-256
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// SHA-256 of the exact bytes `save_model` would write
pub fn model_digest(model: &ModelFile) -> Result<String> {
    Ok(sha256_hex(&serde_json::to_vec_pretty(model)?))
}

fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<Vec<u8>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_vec_pretty(value)?;
    fs::write(path, &json)?;
    Ok(json)
}

fn read_file(path: &Path, what: &str) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(FraudError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} file not found: {}", what, path.display()),
        )));
    }
    Ok(fs::read(path)?)
}

/// Save model to disk, returning the SHA-256 of the written bytes
pub fn save_model(model: &ModelFile, path: &Path) -> Result<String> {
    let bytes = write_json(model, path)?;
    let digest = sha256_hex(&bytes);
    log::info!("Saved model `{}` to {} (sha256 {})", model.name, path.display(), digest);
    Ok(digest)
}

/// Load model and the SHA-256 of its bytes
pub fn load_model(path: &Path) -> Result<(ModelFile, String)> {
    let data = read_file(path, "Model")?;
    let digest = sha256_hex(&data);
    let model: ModelFile = serde_json::from_slice(&data)?;
    model.model.validate()?;
    Ok((model, digest))
}

/// Save calibration artifact to disk
pub fn save_calibration(artifact: &CalibrationArtifact, path: &Path) -> Result<()> {
    write_json(artifact, path)?;
    log::info!(
        "Saved calibration to {} (threshold {:.6})",
        path.display(),
        artifact.threshold()
    );
    Ok(())
}

/// Load calibration artifact with validation
pub fn load_calibration(path: &Path) -> Result<CalibrationArtifact> {
    let data = read_file(path, "Calibration")?;
    let artifact: CalibrationArtifact = serde_json::from_slice(&data)?;

    // Validate version/layout
    validate_calibration(&artifact)?;

    Ok(artifact)
}
