use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use super::TemperaturePredictor;
use crate::scoring::features::{FEATURE_NAMES, FeatureRecord, SegmentStride};

/// Artifact layout version this build understands.
pub const ARTIFACT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model artifact '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid model artifact: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    /// Walks from the root; `x[feature] <= threshold` goes left.
    fn predict(&self, x: &[f64; 4]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    // Children must sit after their parent, so every walk terminates.
    fn validate(&self, tree_idx: usize) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::Invalid(format!("tree {tree_idx} has no nodes")));
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Leaf { value } if !value.is_finite() => {
                    return Err(ModelError::Invalid(format!(
                        "tree {tree_idx} node {idx} has a non-finite leaf"
                    )));
                }
                Node::Leaf { .. } => {}
                Node::Split {
                    feature,
                    left,
                    right,
                    ..
                } => {
                    if *feature >= FEATURE_NAMES.len() {
                        return Err(ModelError::Invalid(format!(
                            "tree {tree_idx} node {idx} splits on unknown feature {feature}"
                        )));
                    }
                    for child in [*left, *right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(ModelError::Invalid(format!(
                                "tree {tree_idx} node {idx} has bad child index {child}"
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Random-forest regressor exported as JSON. Prediction is the mean of the
/// leaf values reached in every tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestModel {
    pub schema_version: u32,
    /// Spacing of `segment_id` in the training data.
    pub segment_stride: SegmentStride,
    pub features: Vec<String>,
    pub trees: Vec<Tree>,
}

impl ForestModel {
    /// Reads and validates an artifact from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let model: ForestModel = serde_json::from_reader(BufReader::new(file))?;
        model.validate()?;

        info!(
            path = %path.display(),
            trees = model.trees.len(),
            segment_stride = model.segment_stride.get(),
            "Temperature model loaded"
        );
        Ok(model)
    }

    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let model: ForestModel = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.schema_version != ARTIFACT_SCHEMA_VERSION {
            return Err(ModelError::Invalid(format!(
                "schema_version {} is not supported (expected {})",
                self.schema_version, ARTIFACT_SCHEMA_VERSION
            )));
        }
        if self.features.iter().map(String::as_str).ne(FEATURE_NAMES) {
            return Err(ModelError::Invalid(format!(
                "features {:?} do not match {:?}",
                self.features, FEATURE_NAMES
            )));
        }
        if self.trees.is_empty() {
            return Err(ModelError::Invalid("model has no trees".into()));
        }
        for (idx, tree) in self.trees.iter().enumerate() {
            tree.validate(idx)?;
        }
        Ok(())
    }
}

impl TemperaturePredictor for ForestModel {
    fn segment_stride(&self) -> SegmentStride {
        self.segment_stride
    }

    fn predict(&self, record: &FeatureRecord) -> anyhow::Result<f64> {
        let x = record.as_vector();
        let total: f64 = self.trees.iter().map(|tree| tree.predict(&x)).sum();
        Ok(total / self.trees.len() as f64)
    }
}
