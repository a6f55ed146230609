//! Error taxonomy for the scoring engine
//!
//! Client-caused errors (`Schema`) are surfaced and never retried.
//! `NotReady` is transient from the caller's point of view.
//! `CalibrationInput` only happens offline and aborts the run.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FraudError>;

/// Malformed, missing or wrong-typed input field
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("missing required field `{0}`")]
    MissingField(String),

    #[error("field `{field}` expected {expected}, got {actual}")]
    WrongType {
        field: String,
        expected: &'static str,
        actual: String,
    },

    #[error("field `{field}` value {value} outside [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("invalid schema: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum FraudError {
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("model `{0}` does not support contribution decomposition")]
    UnsupportedModel(String),

    #[error("artifacts not ready: {0}")]
    NotReady(String),

    #[error("calibration input error: {0}")]
    CalibrationInput(String),

    #[error(
        "feature layout mismatch: expected v{expected_version} (hash: {expected_hash:08x}), \
         got v{actual_version} (hash: {actual_hash:08x})"
    )]
    LayoutMismatch {
        expected_version: u8,
        expected_hash: u32,
        actual_version: u8,
        actual_hash: u32,
    },

    #[error("probability {0} outside [0, 1]")]
    InvalidProbability(f64),

    #[error("invalid model: {0}")]
    InvalidModel(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FraudError {
    /// Caused by the request payload
    pub fn is_client_error(&self) -> bool {
        matches!(self, FraudError::Schema(_))
    }

    /// Safe to retry with backoff
    pub fn is_retryable(&self) -> bool {
        matches!(self, FraudError::NotReady(_))
    }
}
