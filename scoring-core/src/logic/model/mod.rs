//! Model Module - Scorer capability and model families
//!
//! Tách model khỏi encoding/decision: everything downstream sees only the
//! `Scorer` trait and its `Capabilities`.

pub mod scorer;
pub mod trees;
pub mod logistic;
pub mod artifact;

// Re-export common types
pub use scorer::{sigmoid, Capabilities, Decomposition, OpaqueScorer, Scorer};
pub use trees::{RegressionTree, TreeEnsembleModel, TreeEnsembleScorer, TreeNode};
pub use logistic::{FitConfig, LogisticModel, LogisticScorer};
pub use artifact::ModelArtifact;
