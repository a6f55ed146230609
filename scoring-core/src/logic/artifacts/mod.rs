//! Artifacts Module - persisted model and calibration files
//!
//! CHỈ chứa: file formats, JSON storage, consistency checks.
//! KHÔNG chứa: scoring or training logic.

pub mod types;
pub mod storage;
pub mod validate;

#[cfg(test)]
mod tests;

pub use types::{CalibrationArtifact, ModelFile};
pub use storage::{
    load_calibration, load_model, model_digest, save_calibration, save_model, sha256_hex,
};
pub use validate::{validate_calibration, validate_pairing};
