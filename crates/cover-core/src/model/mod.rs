//! Classifier and label-decoder capabilities.
//!
//! The transformer only depends on the two traits here; the JSON-backed
//! [`RandomForest`] and [`LabelEncoder`] are the artifacts shipped with the
//! predictor, but any implementation can be plugged in.

pub mod encoder;
pub mod forest;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::features::FeatureVector;

pub use encoder::LabelEncoder;
pub use forest::{DecisionTree, Node, RandomForest};

/// Class identifier produced by a classifier.
pub type Label = i64;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid model artifact: {0}")]
    Invalid(String),
    #[error("model expects feature {0:?}, which the feature vector does not provide")]
    SchemaMismatch(String),
    #[error("encoded label {0} has no original class")]
    UnknownEncodedLabel(Label),
    #[error(transparent)]
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

/// Single-row inference.
pub trait Classifier {
    fn predict_one(&self, features: &FeatureVector) -> Result<Label, ModelError>;
}

/// Inverse mapping from a training-time encoded label to the original class.
pub trait LabelDecoder {
    fn inverse_transform(&self, encoded: Label) -> Result<Label, ModelError>;
}

/// Run the classifier on one row, then decode the label if a decoder is given.
///
/// Errors from either collaborator are returned as-is.
pub fn predict<C>(
    features: &FeatureVector,
    classifier: &C,
    decoder: Option<&dyn LabelDecoder>,
) -> Result<Label, ModelError>
where
    C: Classifier + ?Sized,
{
    let label = classifier.predict_one(features)?;
    match decoder {
        Some(d) => d.inverse_transform(label),
        None => Ok(label),
    }
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let file = File::open(path)
        .map_err(|source| ModelError::Io { path: path.to_path_buf(), source })?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
