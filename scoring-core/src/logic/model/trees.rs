//! Gradient-boosted tree ensemble (binary logistic)
//!
//! Split semantics: go left when `x[feature] < threshold`. Leaf values are
//! in margin (log-odds) space; the ensemble margin is
//! `base_margin + sum(leaf values)`.
//!
//! Decomposition uses path attribution: every split on the path credits its
//! feature with `E[child] - E[node]`, where `E` is the cover-weighted mean
//! leaf value under a node. Along one path those steps telescope to
//! `leaf - E[root]`, so margin contributions add up exactly.

use serde::{Deserialize, Serialize};

use crate::error::{FraudError, Result};
use super::scorer::{check_width, sigmoid, to_probability_space, Capabilities, Decomposition, Scorer};

// ============================================================================
// MODEL (persisted form)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        cover: f64,
    },
    Leaf {
        value: f64,
        cover: f64,
    },
}

impl TreeNode {
    fn cover(&self) -> f64 {
        match self {
            TreeNode::Split { cover, .. } | TreeNode::Leaf { cover, .. } => *cover,
        }
    }
}

/// Nodes in pre-order; node 0 is the root and children always come after
/// their parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsembleModel {
    pub n_features: usize,
    pub base_margin: f64,
    pub trees: Vec<RegressionTree>,
}

impl TreeEnsembleModel {
    /// Structural validation: indices, finiteness, acyclicity
    pub fn validate(&self) -> Result<()> {
        if !self.base_margin.is_finite() {
            return Err(FraudError::InvalidModel("base_margin is not finite".into()));
        }
        if self.trees.is_empty() {
            return Err(FraudError::InvalidModel("ensemble has no trees".into()));
        }

        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(FraudError::InvalidModel(format!("tree {} is empty", t)));
            }
            let n = tree.nodes.len();
            for (i, node) in tree.nodes.iter().enumerate() {
                let cover = node.cover();
                if !cover.is_finite() || cover < 0.0 {
                    return Err(FraudError::InvalidModel(format!(
                        "tree {} node {} has invalid cover {}",
                        t, i, cover
                    )));
                }
                match node {
                    TreeNode::Split { feature, threshold, left, right, .. } => {
                        if *feature >= self.n_features {
                            return Err(FraudError::InvalidModel(format!(
                                "tree {} node {} splits on feature {} (model has {})",
                                t, i, feature, self.n_features
                            )));
                        }
                        if threshold.is_nan() {
                            return Err(FraudError::InvalidModel(format!(
                                "tree {} node {} has a NaN threshold",
                                t, i
                            )));
                        }
                        // children after parent ⇒ no cycles
                        for child in [left, right] {
                            if *child <= i || *child >= n {
                                return Err(FraudError::InvalidModel(format!(
                                    "tree {} node {} has invalid child {}",
                                    t, i, child
                                )));
                            }
                        }
                    }
                    TreeNode::Leaf { value, .. } => {
                        if !value.is_finite() {
                            return Err(FraudError::InvalidModel(format!(
                                "tree {} leaf {} is not finite",
                                t, i
                            )));
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

// ============================================================================
// SCORER
// ============================================================================

/// Validated ensemble with precomputed node expectations
#[derive(Debug, Clone)]
pub struct TreeEnsembleScorer {
    name: String,
    model: TreeEnsembleModel,
    expectations: Vec<Vec<f64>>,
    expected_margin: f64,
}

impl TreeEnsembleScorer {
    pub fn new(name: impl Into<String>, model: TreeEnsembleModel) -> Result<Self> {
        model.validate()?;

        let expectations: Vec<Vec<f64>> = model.trees.iter().map(node_expectations).collect();
        let expected_margin =
            model.base_margin + expectations.iter().map(|e| e[0]).sum::<f64>();

        Ok(Self {
            name: name.into(),
            model,
            expectations,
            expected_margin,
        })
    }

    pub fn model(&self) -> &TreeEnsembleModel {
        &self.model
    }

    /// Margin of the average instance (cover-weighted)
    pub fn expected_margin(&self) -> f64 {
        self.expected_margin
    }

    pub fn margin(&self, x: &[f64]) -> f64 {
        self.model.base_margin
            + self
                .model
                .trees
                .iter()
                .map(|tree| leaf_value(tree, x))
                .sum::<f64>()
    }

    /// Margin-space contributions per feature
    fn margin_contributions(&self, x: &[f64]) -> Vec<f64> {
        let mut contributions = vec![0.0; self.model.n_features];

        for (tree, expectations) in self.model.trees.iter().zip(&self.expectations) {
            let mut index = 0;
            while let TreeNode::Split { feature, threshold, left, right, .. } = &tree.nodes[index] {
                let next = if x[*feature] < *threshold { *left } else { *right };
                contributions[*feature] += expectations[next] - expectations[index];
                index = next;
            }
        }

        contributions
    }
}

impl Scorer for TreeEnsembleScorer {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::EXPLAINABLE
    }

    fn n_features(&self) -> usize {
        self.model.n_features
    }

    fn predict_proba(&self, x: &[f64]) -> Result<f64> {
        check_width(&self.name, self.model.n_features, x)?;
        Ok(sigmoid(self.margin(x)))
    }

    fn decompose(&self, x: &[f64]) -> Result<Decomposition> {
        check_width(&self.name, self.model.n_features, x)?;
        let contributions = self.margin_contributions(x);
        Ok(to_probability_space(contributions, self.margin(x), self.expected_margin))
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn leaf_value(tree: &RegressionTree, x: &[f64]) -> f64 {
    let mut index = 0;
    loop {
        match &tree.nodes[index] {
            TreeNode::Leaf { value, .. } => return *value,
            TreeNode::Split { feature, threshold, left, right, .. } => {
                index = if x[*feature] < *threshold { *left } else { *right };
            }
        }
    }
}

/// Cover-weighted expectation under every node. Children come after their
/// parent, so one reverse pass is enough.
fn node_expectations(tree: &RegressionTree) -> Vec<f64> {
    let mut expectations = vec![0.0; tree.nodes.len()];

    for index in (0..tree.nodes.len()).rev() {
        expectations[index] = match &tree.nodes[index] {
            TreeNode::Leaf { value, .. } => *value,
            TreeNode::Split { left, right, .. } => {
                let left_cover = tree.nodes[*left].cover();
                let right_cover = tree.nodes[*right].cover();
                let total = left_cover + right_cover;
                if total > 0.0 {
                    (left_cover * expectations[*left] + right_cover * expectations[*right]) / total
                } else {
                    (expectations[*left] + expectations[*right]) / 2.0
                }
            }
        };
    }

    expectations
}

#[cfg(test)]
mod tests {
    use super::*;

    /// x0 < 0.5 ? (x1 < 0 ? -1 : 1) : 2   with covers 10 / (4, 6) / 10
    fn stump_model() -> TreeEnsembleModel {
        TreeEnsembleModel {
            n_features: 2,
            base_margin: -1.0,
            trees: vec![RegressionTree {
                nodes: vec![
                    TreeNode::Split { feature: 0, threshold: 0.5, left: 1, right: 4, cover: 20.0 },
                    TreeNode::Split { feature: 1, threshold: 0.0, left: 2, right: 3, cover: 10.0 },
                    TreeNode::Leaf { value: -1.0, cover: 4.0 },
                    TreeNode::Leaf { value: 1.0, cover: 6.0 },
                    TreeNode::Leaf { value: 2.0, cover: 10.0 },
                ],
            }],
        }
    }

    #[test]
    fn test_expectations() {
        let e = node_expectations(&stump_model().trees[0]);
        // node 1: (4*-1 + 6*1)/10 = 0.2 ; root: (10*0.2 + 10*2)/20 = 1.1
        assert!((e[1] - 0.2).abs() < 1e-12);
        assert!((e[0] - 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_predict() {
        let scorer = TreeEnsembleScorer::new("gbt", stump_model()).unwrap();
        assert!((scorer.margin(&[0.0, -1.0]) - (-2.0)).abs() < 1e-12);
        assert!((scorer.margin(&[0.9, -1.0]) - 1.0).abs() < 1e-12);
        let p = scorer.predict_proba(&[0.9, 0.0]).unwrap();
        assert!((p - sigmoid(1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_margin_contributions_telescope() {
        let scorer = TreeEnsembleScorer::new("gbt", stump_model()).unwrap();
        let x = [0.0, 1.0];
        let c = scorer.margin_contributions(&x);
        // root → node1: 0.2 - 1.1 on x0 ; node1 → leaf 3: 1.0 - 0.2 on x1
        assert!((c[0] - (-0.9)).abs() < 1e-12);
        assert!((c[1] - 0.8).abs() < 1e-12);
        let total: f64 = c.iter().sum();
        assert!((total - (scorer.margin(&x) - scorer.expected_margin())).abs() < 1e-12);
    }

    #[test]
    fn test_decompose_is_additive_in_probability_space() {
        let scorer = TreeEnsembleScorer::new("gbt", stump_model()).unwrap();
        for x in [[0.0, -1.0], [0.0, 1.0], [1.0, 5.0]] {
            let d = scorer.decompose(&x).unwrap();
            assert!(d.residual() < 1e-12);
            assert_eq!(d.probability, scorer.predict_proba(&x).unwrap());
        }
    }

    #[test]
    fn test_validate_rejects_bad_structure() {
        let mut model = stump_model();
        model.trees[0].nodes[1] =
            TreeNode::Split { feature: 1, threshold: 0.0, left: 0, right: 3, cover: 10.0 };
        assert!(model.validate().is_err());

        let mut model = stump_model();
        model.trees[0].nodes[0] =
            TreeNode::Split { feature: 7, threshold: 0.5, left: 1, right: 4, cover: 20.0 };
        assert!(TreeEnsembleScorer::new("gbt", model).is_err());

        let mut model = stump_model();
        model.trees.clear();
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_width_mismatch() {
        let scorer = TreeEnsembleScorer::new("gbt", stump_model()).unwrap();
        assert!(matches!(
            scorer.predict_proba(&[0.0]),
            Err(FraudError::InvalidModel(_))
        ));
    }

    #[test]
    fn test_serde_node_tags() {
        let json = serde_json::to_value(&stump_model()).unwrap();
        assert_eq!(json["trees"][0]["nodes"][0]["type"], "split");
        assert_eq!(json["trees"][0]["nodes"][2]["type"], "leaf");
    }
}
