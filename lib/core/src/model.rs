//! Regression models
//!
//! The model is trained offline and shipped as a JSON artifact. Two shapes
//! are understood:
//!
//! ```json
//! {"type": "linear", "intercept": 120000.0, "coefficients": [1.5, -2.0]}
//! ```
//!
//! ```json
//! {"type": "tree_ensemble", "n_features": 2, "base_score": 0.0, "aggregation": "mean",
//!  "trees": [{"nodes": [{"feature": 0, "threshold": 1.5, "left": 1, "right": 2},
//!                       {"leaf": 100.0}, {"leaf": 200.0}]}]}
//! ```
//!
//! Tree nodes follow the scikit-learn convention: a sample goes to `left`
//! when `x[feature] <= threshold`. `mean` aggregation covers random forests,
//! `sum` covers gradient boosting with the learning rate folded into leaves.

use crate::error::{ArtifactError, InferenceError, Result};
use crate::features::FeatureVector;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Single-row inference.
pub trait Predictor: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> std::result::Result<f64, InferenceError>;

    /// Number of features the model was trained on, when known.
    fn expected_features(&self) -> Option<usize> {
        None
    }
}

/// A deserialized model artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearModel),
    TreeEnsemble(TreeEnsemble),
}

impl ModelArtifact {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ArtifactError::io(path, e))?;
        let model = Self::from_reader(BufReader::new(file))?;
        tracing::debug!(
            "Loaded {} model with {} features from {:?}",
            model.kind(),
            model.n_features(),
            path
        );
        Ok(model)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let model: ModelArtifact = serde_json::from_reader(reader)?;
        model.validate()?;
        Ok(model)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ModelArtifact::Linear(_) => "linear",
            ModelArtifact::TreeEnsemble(_) => "tree_ensemble",
        }
    }

    pub fn n_features(&self) -> usize {
        match self {
            ModelArtifact::Linear(m) => m.coefficients.len(),
            ModelArtifact::TreeEnsemble(m) => m.n_features,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            ModelArtifact::Linear(m) => m.validate(),
            ModelArtifact::TreeEnsemble(m) => m.validate(),
        }
    }

    fn evaluate(&self, x: &[f64]) -> f64 {
        match self {
            ModelArtifact::Linear(m) => m.evaluate(x),
            ModelArtifact::TreeEnsemble(m) => m.evaluate(x),
        }
    }
}

impl Predictor for ModelArtifact {
    fn predict(&self, features: &FeatureVector) -> std::result::Result<f64, InferenceError> {
        let expected = self.n_features();
        if features.len() != expected {
            return Err(InferenceError::FeatureCount {
                expected,
                actual: features.len(),
            });
        }

        let estimate = self.evaluate(features.as_slice());
        if !estimate.is_finite() {
            return Err(InferenceError::NonFinite(estimate));
        }
        Ok(estimate)
    }

    fn expected_features(&self) -> Option<usize> {
        Some(self.n_features())
    }
}

/// Ordinary least squares style model: `intercept + coefficients . x`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    #[serde(default)]
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearModel {
    fn validate(&self) -> Result<()> {
        if self.coefficients.is_empty() {
            return Err(ArtifactError::InvalidModel("linear model has no coefficients".to_string()));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ArtifactError::InvalidModel(
                "linear model has non-finite parameters".to_string(),
            ));
        }
        Ok(())
    }

    #[inline]
    fn evaluate(&self, x: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(x)
                .map(|(c, v)| c * v)
                .sum::<f64>()
    }
}

/// How tree outputs are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    #[default]
    Mean,
    Sum,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    pub n_features: usize,
    #[serde(default)]
    pub base_score: f64,
    #[serde(default)]
    pub aggregation: Aggregation,
    pub trees: Vec<RegressionTree>,
}

impl TreeEnsemble {
    fn validate(&self) -> Result<()> {
        if self.n_features == 0 {
            return Err(ArtifactError::InvalidModel("n_features must be positive".to_string()));
        }
        if self.trees.is_empty() {
            return Err(ArtifactError::InvalidModel("ensemble has no trees".to_string()));
        }
        for (index, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features)
                .map_err(|reason| ArtifactError::InvalidModel(format!("tree {}: {}", index, reason)))?;
        }
        Ok(())
    }

    fn evaluate(&self, x: &[f64]) -> f64 {
        let total: f64 = self.trees.iter().map(|tree| tree.evaluate(x)).sum();
        match self.aggregation {
            Aggregation::Mean => self.base_score + total / self.trees.len() as f64,
            Aggregation::Sum => self.base_score + total,
        }
    }
}

/// A binary regression tree stored as a flat node array; node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Leaf {
        leaf: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

impl RegressionTree {
    // Children must come after their parent, so evaluation always terminates.
    fn validate(&self, n_features: usize) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        let len = self.nodes.len();
        for (index, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Leaf { leaf } => {
                    if !leaf.is_finite() {
                        return Err(format!("node {} has a non-finite leaf", index));
                    }
                }
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= n_features {
                        return Err(format!(
                            "node {} splits on feature {} of {}",
                            index, feature, n_features
                        ));
                    }
                    if threshold.is_nan() {
                        return Err(format!("node {} has a NaN threshold", index));
                    }
                    for child in [left, right] {
                        if child <= index || child >= len {
                            return Err(format!("node {} has invalid child {}", index, child));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn evaluate(&self, x: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match self.nodes[index] {
                TreeNode::Leaf { leaf } => return leaf,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if x[feature] <= threshold { left } else { right };
                }
            }
        }
    }
}
