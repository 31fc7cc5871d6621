//! Label encoder artifact: `{"classes": [1, 2, 3, 4, 5, 6, 7]}`.
//!
//! The classifier was trained on the positions in `classes`; decoding maps a
//! position back to the class identifier stored there.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{read_json, Label, LabelDecoder, ModelError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EncoderArtifact", into = "EncoderArtifact")]
pub struct LabelEncoder {
    classes: Vec<Label>,
}

#[derive(Serialize, Deserialize)]
struct EncoderArtifact {
    classes: Vec<Label>,
}

impl LabelEncoder {
    /// Classes must be non-empty and distinct.
    pub fn new(classes: Vec<Label>) -> Result<Self, ModelError> {
        if classes.is_empty() {
            return Err(ModelError::Invalid("label encoder has no classes".into()));
        }
        for (i, c) in classes.iter().enumerate() {
            if classes[..i].contains(c) {
                return Err(ModelError::Invalid(format!("label encoder lists class {c} twice")));
            }
        }
        Ok(Self { classes })
    }

    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let encoder: Self = read_json(path)?;
        tracing::debug!(
            path = %path.display(),
            classes = encoder.classes.len(),
            "label encoder loaded"
        );
        Ok(encoder)
    }

    pub fn classes(&self) -> &[Label] {
        &self.classes
    }

    /// Encoded position of an original class.
    pub fn transform(&self, class: Label) -> Option<Label> {
        self.classes.iter().position(|&c| c == class).map(|i| i as Label)
    }
}

impl LabelDecoder for LabelEncoder {
    fn inverse_transform(&self, encoded: Label) -> Result<Label, ModelError> {
        usize::try_from(encoded)
            .ok()
            .and_then(|i| self.classes.get(i).copied())
            .ok_or(ModelError::UnknownEncodedLabel(encoded))
    }
}

impl TryFrom<EncoderArtifact> for LabelEncoder {
    type Error = ModelError;

    fn try_from(a: EncoderArtifact) -> Result<Self, Self::Error> {
        Self::new(a.classes)
    }
}

impl From<LabelEncoder> for EncoderArtifact {
    fn from(e: LabelEncoder) -> Self {
        Self { classes: e.classes }
    }
}
