//! Model Registry
//!
//! Single-writer / many-reader readiness cell. Readers clone the `Arc` and
//! drop the lock before scoring, so a slow request never blocks a reload.

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{FraudError, Result};
use super::serving::ServingArtifacts;

// ============================================================================
// STATE
// ============================================================================

#[derive(Debug, Clone)]
pub enum Readiness {
    Loading,
    Ready(Arc<ServingArtifacts>),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessState {
    Loading,
    Ready,
    Failed,
}

/// Registry status for health checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryStatus {
    pub state: ReadinessState,
    pub model_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

// ============================================================================
// REGISTRY
// ============================================================================

#[derive(Debug)]
pub struct ModelRegistry {
    state: RwLock<Readiness>,
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(Readiness::Loading),
        }
    }

    /// Registry that is ready from the start
    pub fn ready(artifacts: ServingArtifacts) -> Self {
        Self {
            state: RwLock::new(Readiness::Ready(Arc::new(artifacts))),
        }
    }

    /// Load from disk. A failure leaves the registry `Failed`, never half-built.
    pub fn load_from(&self, dir: &Path, model_file: &str, calibration_file: &str) -> Result<()> {
        match ServingArtifacts::load(dir, model_file, calibration_file) {
            Ok(artifacts) => {
                self.install(artifacts);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load artifacts from {}: {}", dir.display(), e);
                self.fail(e.to_string());
                Err(e)
            }
        }
    }

    pub fn install(&self, artifacts: ServingArtifacts) -> Arc<ServingArtifacts> {
        let artifacts = Arc::new(artifacts);
        *self.state.write() = Readiness::Ready(Arc::clone(&artifacts));
        artifacts
    }

    pub fn fail(&self, reason: impl Into<String>) {
        *self.state.write() = Readiness::Failed(reason.into());
    }

    pub fn is_ready(&self) -> bool {
        matches!(*self.state.read(), Readiness::Ready(_))
    }

    pub fn readiness(&self) -> Readiness {
        self.state.read().clone()
    }

    pub fn status(&self) -> RegistryStatus {
        match &*self.state.read() {
            Readiness::Loading => RegistryStatus {
                state: ReadinessState::Loading,
                model_loaded: false,
                reason: None,
            },
            Readiness::Ready(_) => RegistryStatus {
                state: ReadinessState::Ready,
                model_loaded: true,
                reason: None,
            },
            Readiness::Failed(reason) => RegistryStatus {
                state: ReadinessState::Failed,
                model_loaded: false,
                reason: Some(reason.clone()),
            },
        }
    }

    /// Current artifacts, or `NotReady`
    pub fn artifacts(&self) -> Result<Arc<ServingArtifacts>> {
        match &*self.state.read() {
            Readiness::Ready(artifacts) => Ok(Arc::clone(artifacts)),
            Readiness::Loading => Err(FraudError::NotReady("artifacts are still loading".into())),
            Readiness::Failed(reason) => Err(FraudError::NotReady(format!(
                "artifacts failed to load: {}",
                reason
            ))),
        }
    }
}
