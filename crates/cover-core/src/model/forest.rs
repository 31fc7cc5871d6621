//! Random-forest classifier artifact.
//!
//! JSON layout:
//! ```text
//! {
//!   "feature_names": ["Elevation", ...],      // model column order
//!   "classes": [0, 1, 2, 3, 4, 5, 6],
//!   "trees": [
//!     { "nodes": [
//!         {"kind": "split", "feature": 0, "threshold": 2950.5, "left": 1, "right": 2},
//!         {"kind": "leaf", "value": [12.0, 3.0, 0.0, 0.0, 0.0, 0.0, 0.0]},
//!         ...
//!     ] }
//!   ]
//! }
//! ```
//!
//! Each tree votes with its normalized leaf distribution; the forest predicts
//! the class with the highest mean probability (first one on ties). A split
//! sends `x <= threshold` to the left child.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{read_json, Classifier, Label, ModelError};
use crate::features::FeatureVector;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Split {
        /// Index into the forest's `feature_names`.
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        /// Per-class weights (sample counts or fractions).
        value: Vec<f64>,
    },
}

/// Flat node array; node 0 is the root and children always follow their parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<Node>,
}

impl DecisionTree {
    fn validate(&self, tree: usize, n_features: usize, n_classes: usize) -> Result<(), ModelError> {
        let invalid = |msg: String| ModelError::Invalid(format!("tree {tree}: {msg}"));

        if self.nodes.is_empty() {
            return Err(invalid("no nodes".into()));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Split { feature, threshold, left, right } => {
                    if *feature >= n_features {
                        return Err(invalid(format!(
                            "node {i} splits on unknown feature {feature}"
                        )));
                    }
                    if threshold.is_nan() {
                        return Err(invalid(format!("node {i} has a NaN threshold")));
                    }
                    for child in [*left, *right] {
                        if child <= i || child >= self.nodes.len() {
                            return Err(invalid(format!("node {i} has out-of-order child {child}")));
                        }
                    }
                }
                Node::Leaf { value } => {
                    if value.len() != n_classes {
                        return Err(invalid(format!(
                            "leaf {i} has {} weights for {n_classes} classes",
                            value.len()
                        )));
                    }
                    if value.iter().any(|w| !w.is_finite() || *w < 0.0) {
                        return Err(invalid(format!(
                            "leaf {i} has a negative or non-finite weight"
                        )));
                    }
                    let total: f64 = value.iter().sum();
                    if total <= 0.0 {
                        return Err(invalid(format!("leaf {i} has zero total weight")));
                    }
                    if !total.is_finite() {
                        return Err(invalid(format!("leaf {i} total weight overflows")));
                    }
                }
            }
        }
        Ok(())
    }

    /// Leaf weights reached by `row` (model column order).
    fn leaf(&self, row: &[f64]) -> &[f64] {
        let mut i = 0;
        loop {
            match &self.nodes[i] {
                Node::Split { feature, threshold, left, right } => {
                    i = if row[*feature] <= *threshold { *left } else { *right };
                }
                Node::Leaf { value } => return value,
            }
        }
    }

    fn add_distribution(&self, row: &[f64], acc: &mut [f64]) {
        let leaf = self.leaf(row);
        let total: f64 = leaf.iter().sum();
        for (a, w) in acc.iter_mut().zip(leaf) {
            *a += w / total;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ForestArtifact", into = "ForestArtifact")]
pub struct RandomForest {
    feature_names: Vec<String>,
    classes: Vec<Label>,
    trees: Vec<DecisionTree>,
    /// Model column → position in [`FeatureVector`], `None` if the schema lacks it.
    columns: Vec<Option<usize>>,
}

#[derive(Serialize, Deserialize)]
struct ForestArtifact {
    feature_names: Vec<String>,
    classes: Vec<Label>,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn new(
        feature_names: Vec<String>,
        classes: Vec<Label>,
        trees: Vec<DecisionTree>,
    ) -> Result<Self, ModelError> {
        if feature_names.is_empty() {
            return Err(ModelError::Invalid("forest has no features".into()));
        }
        if classes.is_empty() {
            return Err(ModelError::Invalid("forest has no classes".into()));
        }
        if trees.is_empty() {
            return Err(ModelError::Invalid("forest has no trees".into()));
        }
        for (t, tree) in trees.iter().enumerate() {
            tree.validate(t, feature_names.len(), classes.len())?;
        }

        let columns = feature_names.iter().map(|n| FeatureVector::index_of(n)).collect();
        Ok(Self { feature_names, classes, trees, columns })
    }

    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let forest: Self = read_json(path)?;
        tracing::debug!(
            path = %path.display(),
            trees = forest.trees.len(),
            classes = forest.classes.len(),
            "random forest loaded"
        );
        Ok(forest)
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn classes(&self) -> &[Label] {
        &self.classes
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Reorder a feature vector into model column order.
    fn model_row(&self, features: &FeatureVector) -> Result<Vec<f64>, ModelError> {
        let values = features.as_slice();
        self.columns
            .iter()
            .zip(&self.feature_names)
            .map(|(col, name)| {
                col.map(|i| values[i]).ok_or_else(|| ModelError::SchemaMismatch(name.clone()))
            })
            .collect()
    }

    /// Mean class probabilities over all trees, in `classes` order.
    pub fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>, ModelError> {
        let row = self.model_row(features)?;
        let mut proba = self.accumulate(&row);
        let n = self.trees.len() as f64;
        for p in &mut proba {
            *p /= n;
        }
        Ok(proba)
    }

    #[cfg(not(feature = "threading"))]
    fn accumulate(&self, row: &[f64]) -> Vec<f64> {
        let mut acc = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            tree.add_distribution(row, &mut acc);
        }
        acc
    }

    #[cfg(feature = "threading")]
    fn accumulate(&self, row: &[f64]) -> Vec<f64> {
        use rayon::prelude::*;

        let n_classes = self.classes.len();
        self.trees
            .par_iter()
            .fold(
                || vec![0.0; n_classes],
                |mut acc, tree| {
                    tree.add_distribution(row, &mut acc);
                    acc
                },
            )
            .reduce(
                || vec![0.0; n_classes],
                |mut a, b| {
                    for (x, y) in a.iter_mut().zip(b) {
                        *x += y;
                    }
                    a
                },
            )
    }
}

impl Classifier for RandomForest {
    fn predict_one(&self, features: &FeatureVector) -> Result<Label, ModelError> {
        let proba = self.predict_proba(features)?;
        let best =
            (1..proba.len()).fold(0, |best, i| if proba[i] > proba[best] { i } else { best });
        Ok(self.classes[best])
    }
}

impl TryFrom<ForestArtifact> for RandomForest {
    type Error = ModelError;

    fn try_from(a: ForestArtifact) -> Result<Self, Self::Error> {
        Self::new(a.feature_names, a.classes, a.trees)
    }
}

impl From<RandomForest> for ForestArtifact {
    fn from(f: RandomForest) -> Self {
        Self { feature_names: f.feature_names, classes: f.classes, trees: f.trees }
    }
}
