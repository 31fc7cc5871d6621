//! One form submission, end to end.
//!
//! Order: engineered features → feature vector → classifier (+ optional
//! decoder) → display strings. Nothing here fails on its own; errors come
//! only from the classifier or decoder and are passed through untouched.

use serde::Serialize;

use crate::features::{build_feature_vector, compute_engineered_features, FeatureVector};
use crate::labels::{decode_cover_type, describe_wilderness_areas};
use crate::model::{predict, Classifier, Label, LabelDecoder, ModelError};
use crate::observation::RawObservation;

/// Everything the display needs after a submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Decoded class label.
    pub label: Label,
    pub cover_type: String,
    pub wilderness: String,
    pub features: FeatureVector,
}

pub fn evaluate<C>(
    raw: &RawObservation,
    classifier: &C,
    decoder: Option<&dyn LabelDecoder>,
) -> Result<Prediction, ModelError>
where
    C: Classifier + ?Sized,
{
    let derived = compute_engineered_features(raw);
    let features = build_feature_vector(raw, &derived);
    let label = predict(&features, classifier, decoder)?;

    Ok(Prediction {
        label,
        cover_type: decode_cover_type(label),
        wilderness: describe_wilderness_areas(raw.wilderness_area_1, raw.wilderness_area_4),
        features,
    })
}

/// Loaded classifier plus optional label decoder, reused across submissions.
pub struct Predictor {
    classifier: Box<dyn Classifier>,
    decoder: Option<Box<dyn LabelDecoder>>,
}

impl Predictor {
    pub fn new(classifier: Box<dyn Classifier>) -> Self {
        Self { classifier, decoder: None }
    }

    pub fn with_decoder(mut self, decoder: Box<dyn LabelDecoder>) -> Self {
        self.decoder = Some(decoder);
        self
    }

    pub fn has_decoder(&self) -> bool {
        self.decoder.is_some()
    }

    pub fn evaluate(&self, raw: &RawObservation) -> Result<Prediction, ModelError> {
        evaluate(raw, self.classifier.as_ref(), self.decoder.as_deref())
    }
}
