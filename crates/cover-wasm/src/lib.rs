use anyhow::{Context, Result};
use cover_core::{
    describe_wilderness_areas, evaluate, LabelEncoder, Prediction, RandomForest, RawObservation,
};
use wasm_bindgen::prelude::*;

/// Predict the cover type for one form submission.
///
/// `observation_json` is a RawObservation, `model_json` a random-forest
/// artifact and `encoder_json` an optional label encoder artifact.
/// Returns the Prediction as a JS object.
#[wasm_bindgen]
pub fn predict(
    observation_json: &str,
    model_json: &str,
    encoder_json: Option<String>,
) -> Result<JsValue, JsValue> {
    let prediction = predict_from_json(observation_json, model_json, encoder_json.as_deref())
        .map_err(|e| JsValue::from_str(&format!("{e:#}")))?;

    serde_wasm_bindgen::to_value(&prediction)
        .map_err(|e| JsValue::from_str(&format!("Failed to serialise prediction: {e}")))
}

/// Display string for the two wilderness selectors.
#[wasm_bindgen]
pub fn describe_wilderness(area_1: bool, area_4: bool) -> String {
    describe_wilderness_areas(area_1, area_4)
}

fn predict_from_json(
    observation_json: &str,
    model_json: &str,
    encoder_json: Option<&str>,
) -> Result<Prediction> {
    let raw: RawObservation =
        serde_json::from_str(observation_json).context("Invalid observation")?;
    let forest = RandomForest::from_json_str(model_json).context("Invalid model")?;
    let encoder = encoder_json
        .map(LabelEncoder::from_json_str)
        .transpose()
        .context("Invalid label encoder")?;

    let decoder = encoder.as_ref().map(|e| e as &dyn cover_core::LabelDecoder);
    Ok(evaluate(&raw, &forest, decoder)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OBSERVATION: &str = r#"{
        "elevation": 3000, "aspect": 90,
        "hillshade_morning": 220, "hillshade_noon": 210, "hillshade_evening": 150,
        "distance_to_roadways": 500, "distance_to_fire_points": 1000,
        "distance_to_hydrology_horizontal": 100, "distance_to_hydrology_vertical": 20,
        "wilderness_area_1": 1, "wilderness_area_4": 0
    }"#;

    const MODEL: &str = r#"{
        "feature_names": ["Elevation"],
        "classes": [0, 1],
        "trees": [{"nodes": [
            {"kind": "split", "feature": 0, "threshold": 2800.0, "left": 1, "right": 2},
            {"kind": "leaf", "value": [1.0, 0.0]},
            {"kind": "leaf", "value": [0.0, 1.0]}
        ]}]
    }"#;

    #[test]
    fn predicts_with_and_without_encoder() {
        let p = predict_from_json(OBSERVATION, MODEL, None).unwrap();
        assert_eq!(p.label, 1);
        assert_eq!(p.cover_type, "Spruce/Fir");
        assert_eq!(p.wilderness, "Rawah");

        let p = predict_from_json(OBSERVATION, MODEL, Some(r#"{"classes": [6, 7]}"#)).unwrap();
        assert_eq!(p.label, 7);
        assert_eq!(p.cover_type, "Krummholz");
    }

    #[test]
    fn bad_inputs_name_the_failing_artifact() {
        let err = predict_from_json("{}", MODEL, None).unwrap_err();
        assert!(format!("{err:#}").starts_with("Invalid observation"));

        let err = predict_from_json(OBSERVATION, "[]", None).unwrap_err();
        assert!(format!("{err:#}").starts_with("Invalid model"));

        let err = predict_from_json(OBSERVATION, MODEL, Some("{}")).unwrap_err();
        assert!(format!("{err:#}").starts_with("Invalid label encoder"));
    }

    #[test]
    fn wilderness_passthrough() {
        assert_eq!(describe_wilderness(false, true), "Cache la Poudre");
    }
}
