//! Configuration module

use std::env;
use std::path::PathBuf;

use fraud_scoring_core::constants::{
    get_artifact_dir, DEFAULT_CALIBRATION_FILE, DEFAULT_MODEL_FILE, DEFAULT_TOP_K,
};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Directory holding the model and calibration files
    pub artifact_dir: PathBuf,

    /// Model file name inside `artifact_dir`
    pub model_file: String,

    /// Calibration file name inside `artifact_dir`
    pub calibration_file: String,

    /// Reasons returned when the request does not set `top_k`
    pub top_k: usize,

    /// Environment (development, production)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            artifact_dir: get_artifact_dir(),
            model_file: DEFAULT_MODEL_FILE.to_string(),
            calibration_file: DEFAULT_CALIBRATION_FILE.to_string(),
            top_k: DEFAULT_TOP_K,
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            artifact_dir: env::var("ARTIFACT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.artifact_dir),

            model_file: env::var("MODEL_FILE").unwrap_or(defaults.model_file),

            calibration_file: env::var("CALIBRATION_FILE").unwrap_or(defaults.calibration_file),

            top_k: env::var("TOP_K")
                .ok()
                .and_then(|k| k.parse().ok())
                .filter(|k: &usize| *k > 0)
                .unwrap_or(defaults.top_k),

            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
