//! Persisted model families

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use super::logistic::{LogisticModel, LogisticScorer};
use super::scorer::Scorer;
use super::trees::{TreeEnsembleModel, TreeEnsembleScorer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum ModelArtifact {
    Logistic(LogisticModel),
    TreeEnsemble(TreeEnsembleModel),
}

impl ModelArtifact {
    pub fn family(&self) -> &'static str {
        match self {
            ModelArtifact::Logistic(_) => "logistic",
            ModelArtifact::TreeEnsemble(_) => "tree_ensemble",
        }
    }

    pub fn n_features(&self) -> usize {
        match self {
            ModelArtifact::Logistic(m) => m.n_features(),
            ModelArtifact::TreeEnsemble(m) => m.n_features,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            ModelArtifact::Logistic(m) => m.validate(),
            ModelArtifact::TreeEnsemble(m) => m.validate(),
        }
    }

    /// Build the serving scorer (validates first)
    pub fn into_scorer(self, name: &str) -> Result<Arc<dyn Scorer>> {
        let scorer: Arc<dyn Scorer> = match self {
            ModelArtifact::Logistic(m) => Arc::new(LogisticScorer::new(name, m)?),
            ModelArtifact::TreeEnsemble(m) => Arc::new(TreeEnsembleScorer::new(name, m)?),
        };
        Ok(scorer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_serde() {
        let artifact = ModelArtifact::Logistic(LogisticModel {
            weights: vec![1.0, 2.0],
            bias: 0.0,
            reference: vec![],
        });
        let json = serde_json::to_value(&artifact).unwrap();
        assert_eq!(json["family"], "logistic");
        let back: ModelArtifact = serde_json::from_value(json).unwrap();
        assert_eq!(back, artifact);
        assert_eq!(back.n_features(), 2);
    }

    #[test]
    fn test_into_scorer_validates() {
        let artifact = ModelArtifact::Logistic(LogisticModel {
            weights: vec![],
            bias: 0.0,
            reference: vec![],
        });
        assert!(artifact.into_scorer("empty").is_err());
    }
}
