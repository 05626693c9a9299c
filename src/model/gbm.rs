//! Gradient-boosted regression-tree ensemble with binary log-loss.
//!
//! `raw = init_raw + learning_rate * sum(tree(x))`, `p(death) = sigmoid(raw)`.
//! Split rule matches the trainer: `x[feature] <= threshold` goes left.

use super::{check_dim, sigmoid, Classifier};
use crate::error::ScoringError;
use ndarray::ArrayView1;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// Nodes stored flat; node 0 is the root and children always follow their parent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("empty tree".into());
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= n_features {
                        return Err(format!("node {} splits on feature {} of {}", i, feature, n_features));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {} has non-finite threshold", i));
                    }
                    for child in [left, right] {
                        if child <= i || child >= self.nodes.len() {
                            return Err(format!("node {} has invalid child {}", i, child));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("leaf {} has non-finite value", i));
                    }
                }
            }
        }
        Ok(())
    }

    /// Leaf value reached by `x`. Terminates since child indices strictly increase.
    pub fn predict(&self, x: ArrayView1<'_, f64>) -> f64 {
        let mut i = 0;
        loop {
            match self.nodes[i] {
                TreeNode::Leaf { value } => return value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    i = if x[feature] <= threshold { left } else { right };
                }
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GradientBoostingArtifact {
    pub feature_names: Vec<String>,
    /// Prior log-odds of the positive class
    pub init_raw: f64,
    pub learning_rate: f64,
    pub trees: Vec<Tree>,
}

#[derive(Debug, Clone)]
pub struct GradientBoostingClassifier {
    feature_names: Vec<String>,
    init_raw: f64,
    learning_rate: f64,
    trees: Vec<Tree>,
}

impl GradientBoostingClassifier {
    pub fn new(feature_names: Vec<String>, init_raw: f64, learning_rate: f64, trees: Vec<Tree>) -> Result<Self, String> {
        if !init_raw.is_finite() || !learning_rate.is_finite() || learning_rate <= 0.0 {
            return Err("init_raw and learning_rate must be finite, learning_rate positive".into());
        }
        for (t, tree) in trees.iter().enumerate() {
            tree.validate(feature_names.len())
                .map_err(|e| format!("tree {}: {}", t, e))?;
        }
        Ok(Self {
            feature_names,
            init_raw,
            learning_rate,
            trees,
        })
    }

    pub(crate) fn from_artifact(a: GradientBoostingArtifact) -> Result<Self, String> {
        Self::new(a.feature_names, a.init_raw, a.learning_rate, a.trees)
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Log-odds of the positive class
    pub fn decision_function(&self, scaled: ArrayView1<'_, f64>) -> f64 {
        let boost: f64 = self.trees.iter().map(|t| t.predict(scaled)).sum();
        self.init_raw + self.learning_rate * boost
    }
}

impl Classifier for GradientBoostingClassifier {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict_proba(&self, scaled: ArrayView1<'_, f64>) -> Result<[f64; 2], ScoringError> {
        check_dim("classifier", self.feature_names.len(), scaled.len())?;
        let p = sigmoid(self.decision_function(scaled));
        Ok([1.0 - p, p])
    }

    fn kind(&self) -> &'static str {
        "gradient_boosting"
    }
}
