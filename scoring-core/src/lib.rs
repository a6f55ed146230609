//! Fraud Scoring Core
//!
//! Validates and encodes transactions against a frozen feature schema,
//! scores them through an opaque model, applies the calibrated decision
//! threshold and explains which features drove the score.
//!
//! ```text
//! raw record ─► Encoder ─► Scorer ─► probability ─► Decision Policy ─► {label, tier}
//!                  │                     │
//!                  └──── encoded ────────┴──► Attribution Engine ─► ranked reasons
//! ```
//!
//! Calibration runs once offline against a labelled validation set and is
//! persisted next to the model; serving never recomputes it.

pub mod constants;
pub mod error;
pub mod logic;

pub use error::{FraudError, Result, SchemaError};

pub use logic::schema::{ColumnLayout, FeatureSchema, FieldKind, FieldSpec};
pub use logic::features::{EncodedVector, Encoder, FeatureStats, Transaction};
pub use logic::model::{
    Capabilities, Decomposition, LogisticModel, LogisticScorer, ModelArtifact, OpaqueScorer,
    Scorer, TreeEnsembleModel, TreeEnsembleScorer,
};
pub use logic::calibration::{calibrate, CalibrationResult, LabeledScore};
pub use logic::policy::{decide, Label, RiskTier, ScoreResult};
pub use logic::explain::{explain, Attribution, Direction, Explanation};
pub use logic::artifacts::{CalibrationArtifact, ModelFile};
pub use logic::service::{
    calibrate_and_freeze, FraudScoringService, ModelInfo, ModelRegistry, PredictionResponse,
    Readiness, Reason, ScoreResponse, ServingArtifacts, ValidationRecord,
};
