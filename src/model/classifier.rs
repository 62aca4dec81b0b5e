//! Classifier kinds a bundle can carry.
//!
//! Each kind is stored as plain parameters and evaluated directly; there is
//! no training support. Shapes are checked once by [`Classifier::validate`]
//! when the bundle is loaded, and again cheaply while scoring so a broken
//! vector surfaces as an inference failure instead of a panic.

use serde::{Deserialize, Serialize};

use crate::error_handling::PredictError;

/// Activation applied to a dense layer's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    #[default]
    Linear,
    Relu,
    Tanh,
    Sigmoid,
}

impl Activation {
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Activation::Linear => x,
            Activation::Relu => x.max(0.0),
            Activation::Tanh => x.tanh(),
            Activation::Sigmoid => sigmoid(x),
        }
    }
}

pub(crate) fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// One fully connected layer.
///
/// `kernel[i][j]` is the weight from input `i` to output `j`, the layout
/// Keras uses when exporting dense layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    pub kernel: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
    #[serde(default)]
    pub activation: Activation,
}

impl DenseLayer {
    pub fn input_dim(&self) -> usize {
        self.kernel.len()
    }

    pub fn output_dim(&self) -> usize {
        self.bias.len()
    }

    fn forward(&self, input: &[f64]) -> Vec<f64> {
        let mut output = self.bias.clone();
        for (x, row) in input.iter().zip(&self.kernel) {
            for (out, w) in output.iter_mut().zip(row) {
                *out += x * w;
            }
        }
        for out in &mut output {
            *out = self.activation.apply(*out);
        }
        output
    }

    fn validate(&self, index: usize, expected_input: usize) -> Result<(), String> {
        if self.input_dim() != expected_input {
            return Err(format!(
                "layer {index} takes {} inputs, expected {expected_input}",
                self.input_dim()
            ));
        }
        if self.output_dim() == 0 {
            return Err(format!("layer {index} has no outputs"));
        }
        if let Some(row) = self
            .kernel
            .iter()
            .position(|row| row.len() != self.output_dim())
        {
            return Err(format!(
                "layer {index} kernel row {row} does not match its {} biases",
                self.output_dim()
            ));
        }
        let all_finite = self
            .kernel
            .iter()
            .flatten()
            .chain(&self.bias)
            .all(|w| w.is_finite());
        if !all_finite {
            return Err(format!("layer {index} has non-finite weights"));
        }
        Ok(())
    }
}

/// A decision tree node. Children always have a larger index than their
/// parent, which keeps every tree acyclic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    /// `x[feature] <= threshold` goes left.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        label: u8,
    },
}

/// Raw classifier output before the bundle's decision rule is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Score {
    /// A score to compare against the bundle threshold.
    Continuous(f64),
    /// A discrete label, used as is.
    Label(u8),
}

/// Classifier parameters, tagged by `type` in the bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Classifier {
    /// `sigmoid(w · x + b)`
    Logistic { weights: Vec<f64>, bias: f64 },
    /// Dense feed-forward network ending in a single output.
    Mlp { layers: Vec<DenseLayer> },
    /// Binary tree; node 0 is the root.
    DecisionTree { nodes: Vec<TreeNode> },
}

impl Classifier {
    pub fn kind(&self) -> &'static str {
        match self {
            Classifier::Logistic { .. } => "logistic",
            Classifier::Mlp { .. } => "mlp",
            Classifier::DecisionTree { .. } => "decision_tree",
        }
    }

    /// Checks parameter shapes against `n_features` inputs.
    pub(crate) fn validate(&self, n_features: usize) -> Result<(), String> {
        match self {
            Classifier::Logistic { weights, bias } => {
                if weights.len() != n_features {
                    return Err(format!(
                        "logistic classifier has {} weights, expected {n_features}",
                        weights.len()
                    ));
                }
                if !bias.is_finite() || weights.iter().any(|w| !w.is_finite()) {
                    return Err("logistic classifier has non-finite weights".to_string());
                }
                Ok(())
            }
            Classifier::Mlp { layers } => {
                if layers.is_empty() {
                    return Err("mlp classifier has no layers".to_string());
                }
                let mut expected_input = n_features;
                for (index, layer) in layers.iter().enumerate() {
                    layer.validate(index, expected_input)?;
                    expected_input = layer.output_dim();
                }
                if expected_input != 1 {
                    return Err(format!(
                        "mlp classifier ends in {expected_input} outputs, expected 1"
                    ));
                }
                Ok(())
            }
            Classifier::DecisionTree { nodes } => validate_tree(nodes, n_features),
        }
    }

    /// Scores one scaled feature vector.
    ///
    /// # Errors
    ///
    /// `PredictError::Inference` on a dimension mismatch, a broken tree or a
    /// non-finite score.
    pub fn score(&self, x: &[f64]) -> Result<Score, PredictError> {
        match self {
            Classifier::Logistic { weights, bias } => {
                check_dim(weights.len(), x.len())?;
                let z: f64 = weights.iter().zip(x).map(|(w, v)| w * v).sum::<f64>() + bias;
                finite_score(sigmoid(z))
            }
            Classifier::Mlp { layers } => {
                let first = layers
                    .first()
                    .ok_or_else(|| PredictError::Inference("mlp has no layers".to_string()))?;
                check_dim(first.input_dim(), x.len())?;
                let output = layers
                    .iter()
                    .fold(x.to_vec(), |input, layer| layer.forward(&input));
                match output.as_slice() {
                    [score] => finite_score(*score),
                    _ => Err(PredictError::Inference(format!(
                        "mlp produced {} outputs, expected 1",
                        output.len()
                    ))),
                }
            }
            Classifier::DecisionTree { nodes } => walk_tree(nodes, x).map(Score::Label),
        }
    }
}

fn check_dim(expected: usize, actual: usize) -> Result<(), PredictError> {
    if expected == actual {
        Ok(())
    } else {
        Err(PredictError::Inference(format!(
            "classifier expects {expected} inputs, got {actual}"
        )))
    }
}

fn finite_score(score: f64) -> Result<Score, PredictError> {
    if score.is_finite() {
        Ok(Score::Continuous(score))
    } else {
        Err(PredictError::Inference(
            "classifier produced a non-finite score".to_string(),
        ))
    }
}

fn validate_tree(nodes: &[TreeNode], n_features: usize) -> Result<(), String> {
    if nodes.is_empty() {
        return Err("decision tree has no nodes".to_string());
    }
    for (index, node) in nodes.iter().enumerate() {
        match *node {
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if feature >= n_features {
                    return Err(format!(
                        "tree node {index} splits on feature {feature}, only {n_features} declared"
                    ));
                }
                if !threshold.is_finite() {
                    return Err(format!("tree node {index} has a non-finite threshold"));
                }
                for child in [left, right] {
                    if child <= index || child >= nodes.len() {
                        return Err(format!(
                            "tree node {index} has child {child} outside {}..{}",
                            index + 1,
                            nodes.len()
                        ));
                    }
                }
            }
            TreeNode::Leaf { label } => {
                if label > 1 {
                    return Err(format!("tree leaf {index} has label {label}, expected 0 or 1"));
                }
            }
        }
    }
    Ok(())
}

fn walk_tree(nodes: &[TreeNode], x: &[f64]) -> Result<u8, PredictError> {
    let broken = |reason: String| PredictError::Inference(format!("decision tree: {reason}"));
    let mut index = 0;
    // Each step moves to a larger index, so at most nodes.len() steps
    for _ in 0..nodes.len() {
        match nodes.get(index) {
            Some(TreeNode::Leaf { label }) => return Ok(*label),
            Some(TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            }) => {
                let value = x
                    .get(*feature)
                    .ok_or_else(|| broken(format!("feature {feature} outside input")))?;
                let next = if *value <= *threshold { *left } else { *right };
                if next <= index {
                    return Err(broken(format!("node {index} points back to {next}")));
                }
                index = next;
            }
            None => return Err(broken(format!("node {index} does not exist"))),
        }
    }
    Err(broken("no leaf reached".to_string()))
}
