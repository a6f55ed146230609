//! Service Module - serving state and the offline freeze pipeline
//!
//! CHỈ chứa: artifact lifecycle, request-level orchestration.
//! KHÔNG chứa: HTTP (see the server crate).

pub mod response;
pub mod serving;
pub mod registry;
pub mod scoring;
pub mod pipeline;


pub use response::{round_impact, ModelInfo, PredictionResponse, Reason, ScoreResponse, ServiceStats};
pub use serving::ServingArtifacts;
pub use registry::{ModelRegistry, Readiness, ReadinessState, RegistryStatus};
pub use scoring::FraudScoringService;
pub use pipeline::{
    calibrate_and_freeze, freeze_logistic, persist, score_validation_set, train_logistic, FrozenRun,
};
pub use crate::logic::dataset::ValidationRecord;
