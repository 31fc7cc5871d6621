//! Forest cover-type prediction core.
//!
//! Turns one set of terrain measurements into the feature row a trained
//! classifier expects, runs the classifier and decodes its label into the
//! strings shown to the user.

pub mod features;
pub mod labels;
pub mod model;
pub mod observation;
pub mod ranges;
pub mod transformer;

pub use features::{
    build_feature_vector, compute_engineered_features, EngineeredFeatures, FeatureVector,
    FEATURE_COUNT, FEATURE_NAMES,
};
pub use labels::{decode_cover_type, describe_wilderness_areas, CoverType};
pub use model::{predict, Classifier, Label, LabelDecoder, LabelEncoder, ModelError, RandomForest};
pub use observation::{Measurement, RawObservation};
pub use ranges::{MeasurementRanges, RangeError, SliderRange};
pub use transformer::{evaluate, Prediction, Predictor};
