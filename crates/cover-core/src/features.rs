//! Feature engineering: raw measurements → the 15-column classifier row.
//!
//! Column names and order are a contract with the trained model artifact.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::observation::RawObservation;

pub const FEATURE_COUNT: usize = 15;

/// Trained column names, in row order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Elevation",
    "Horizontal_Distance_To_Roadways",
    "Horizontal_Distance_To_Fire_Points",
    "Fire_Road_Ratio",
    "Hydrology_Road_Ratio",
    "Vertical_Distance_To_Hydrology",
    "Wilderness_Area_1",
    "Horizontal_Distance_To_Hydrology",
    "Noon_vs_Evening_Shade",
    "Aspect",
    "Morning_vs_Noon_Shade",
    "Hillshade_Noon",
    "Hillshade_3pm",
    "Hillshade_9am",
    "Wilderness_Area_4",
];

/// Values derived from a [`RawObservation`] before the row is assembled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineeredFeatures {
    pub fire_road_ratio: f64,
    pub hydrology_road_ratio: f64,
    pub morning_vs_noon_shade: i64,
    pub noon_vs_evening_shade: i64,
}

/// Compute the four engineered features.
///
/// Both ratios are defined as exactly 0 when the distance to roadways is 0.
/// Shade differences are exact subtractions in `i64`, so any pair of `i32`
/// inputs is representable; they may be negative.
pub fn compute_engineered_features(raw: &RawObservation) -> EngineeredFeatures {
    let ratio = |numerator: i32| {
        if raw.distance_to_roadways != 0 {
            f64::from(numerator) / f64::from(raw.distance_to_roadways)
        } else {
            0.0
        }
    };

    EngineeredFeatures {
        fire_road_ratio: ratio(raw.distance_to_fire_points),
        hydrology_road_ratio: ratio(raw.distance_to_hydrology_horizontal),
        morning_vs_noon_shade: i64::from(raw.hillshade_morning) - i64::from(raw.hillshade_noon),
        noon_vs_evening_shade: i64::from(raw.hillshade_noon) - i64::from(raw.hillshade_evening),
    }
}

/// Fixed-order, name-addressable feature row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub fn len(&self) -> usize {
        FEATURE_COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Values in [`FEATURE_NAMES`] order.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Position of a named column, if it belongs to the schema.
    pub fn index_of(name: &str) -> Option<usize> {
        FEATURE_NAMES.iter().position(|&n| n == name)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        Self::index_of(name).map(|i| self.values[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.values.iter().copied())
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        let mut map = s.serialize_map(Some(FEATURE_COUNT))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

/// Assemble the classifier row from the raw measurements and derived values.
pub fn build_feature_vector(raw: &RawObservation, derived: &EngineeredFeatures) -> FeatureVector {
    let flag = |b: bool| if b { 1.0 } else { 0.0 };

    FeatureVector {
        values: [
            f64::from(raw.elevation),
            f64::from(raw.distance_to_roadways),
            f64::from(raw.distance_to_fire_points),
            derived.fire_road_ratio,
            derived.hydrology_road_ratio,
            f64::from(raw.distance_to_hydrology_vertical),
            flag(raw.wilderness_area_1),
            f64::from(raw.distance_to_hydrology_horizontal),
            derived.noon_vs_evening_shade as f64,
            f64::from(raw.aspect),
            derived.morning_vs_noon_shade as f64,
            f64::from(raw.hillshade_noon),
            f64::from(raw.hillshade_evening),
            f64::from(raw.hillshade_morning),
            flag(raw.wilderness_area_4),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn scenario() -> RawObservation {
        RawObservation {
            elevation: 3000,
            aspect: 90,
            hillshade_morning: 220,
            hillshade_noon: 210,
            hillshade_evening: 150,
            distance_to_roadways: 500,
            distance_to_fire_points: 1000,
            distance_to_hydrology_horizontal: 100,
            distance_to_hydrology_vertical: 20,
            wilderness_area_1: true,
            wilderness_area_4: false,
        }
    }

    fn random_observation(rng: &mut StdRng) -> RawObservation {
        RawObservation {
            elevation: rng.gen_range(1800..4000),
            aspect: rng.gen_range(0..360),
            hillshade_morning: rng.gen_range(0..=255),
            hillshade_noon: rng.gen_range(0..=255),
            hillshade_evening: rng.gen_range(0..=255),
            distance_to_roadways: rng.gen_range(0..7000),
            distance_to_fire_points: rng.gen_range(0..7000),
            distance_to_hydrology_horizontal: rng.gen_range(0..1400),
            distance_to_hydrology_vertical: rng.gen_range(-170..600),
            wilderness_area_1: rng.gen(),
            wilderness_area_4: rng.gen(),
        }
    }

    #[test]
    fn scenario_engineered_values() {
        let derived = compute_engineered_features(&scenario());
        assert_relative_eq!(derived.fire_road_ratio, 2.0);
        assert_relative_eq!(derived.hydrology_road_ratio, 0.2);
        assert_eq!(derived.morning_vs_noon_shade, 10);
        assert_eq!(derived.noon_vs_evening_shade, 60);
    }

    #[test]
    fn zero_road_distance_gives_zero_ratios() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let raw = RawObservation { distance_to_roadways: 0, ..random_observation(&mut rng) };
            let derived = compute_engineered_features(&raw);
            assert_eq!(derived.fire_road_ratio, 0.0);
            assert_eq!(derived.hydrology_road_ratio, 0.0);
        }
    }

    #[test]
    fn nonzero_road_distance_gives_exact_ratios() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let mut raw = random_observation(&mut rng);
            raw.distance_to_roadways = rng.gen_range(1..7000);
            let derived = compute_engineered_features(&raw);
            let roads = raw.distance_to_roadways as f64;
            assert_relative_eq!(
                derived.fire_road_ratio,
                raw.distance_to_fire_points as f64 / roads,
                max_relative = 1e-12
            );
            assert_relative_eq!(
                derived.hydrology_road_ratio,
                raw.distance_to_hydrology_horizontal as f64 / roads,
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn negative_road_distance_still_divides() {
        let raw = RawObservation {
            distance_to_roadways: -4,
            distance_to_fire_points: 8,
            ..Default::default()
        };
        assert_relative_eq!(compute_engineered_features(&raw).fire_road_ratio, -2.0);
    }

    #[test]
    fn shade_differences_are_unclamped() {
        let raw = RawObservation {
            hillshade_morning: 100,
            hillshade_noon: 250,
            hillshade_evening: 255,
            ..Default::default()
        };
        let derived = compute_engineered_features(&raw);
        assert_eq!(derived.morning_vs_noon_shade, -150);
        assert_eq!(derived.noon_vs_evening_shade, -5);
    }

    #[test]
    fn extreme_shade_inputs_do_not_overflow() {
        let raw = RawObservation {
            hillshade_morning: i32::MAX,
            hillshade_noon: -1,
            hillshade_evening: i32::MAX,
            ..Default::default()
        };
        let derived = compute_engineered_features(&raw);
        assert_eq!(derived.morning_vs_noon_shade, 2_147_483_648);
        assert_eq!(derived.noon_vs_evening_shade, -2_147_483_648);

        let fv = build_feature_vector(&raw, &derived);
        assert_eq!(fv.get("Morning_vs_Noon_Shade"), Some(2_147_483_648.0));
        assert_eq!(fv.get("Noon_vs_Evening_Shade"), Some(-2_147_483_648.0));

        let raw = RawObservation { hillshade_noon: i32::MIN, hillshade_evening: i32::MAX, ..raw };
        let derived = compute_engineered_features(&raw);
        assert_eq!(derived.noon_vs_evening_shade, -4_294_967_295);
    }

    #[test]
    fn vector_has_fifteen_entries_for_all_zero_input() {
        let raw = RawObservation::default();
        let fv = build_feature_vector(&raw, &compute_engineered_features(&raw));
        assert_eq!(fv.len(), 15);
        assert_eq!(fv.iter().count(), 15);
        assert!(fv.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn vector_places_values_under_trained_names() {
        let raw = scenario();
        let fv = build_feature_vector(&raw, &compute_engineered_features(&raw));
        assert_eq!(fv.get("Elevation"), Some(3000.0));
        assert_eq!(fv.get("Horizontal_Distance_To_Roadways"), Some(500.0));
        assert_eq!(fv.get("Horizontal_Distance_To_Fire_Points"), Some(1000.0));
        assert_eq!(fv.get("Fire_Road_Ratio"), Some(2.0));
        assert_eq!(fv.get("Vertical_Distance_To_Hydrology"), Some(20.0));
        assert_eq!(fv.get("Wilderness_Area_1"), Some(1.0));
        assert_eq!(fv.get("Horizontal_Distance_To_Hydrology"), Some(100.0));
        assert_eq!(fv.get("Noon_vs_Evening_Shade"), Some(60.0));
        assert_eq!(fv.get("Aspect"), Some(90.0));
        assert_eq!(fv.get("Morning_vs_Noon_Shade"), Some(10.0));
        assert_eq!(fv.get("Hillshade_Noon"), Some(210.0));
        assert_eq!(fv.get("Hillshade_3pm"), Some(150.0));
        assert_eq!(fv.get("Hillshade_9am"), Some(220.0));
        assert_eq!(fv.get("Wilderness_Area_4"), Some(0.0));
        assert_relative_eq!(fv.get("Hydrology_Road_Ratio").unwrap(), 0.2);
        assert_eq!(fv.get("Soil_Type_1"), None);
    }

    #[test]
    fn vector_serializes_as_named_map() {
        let raw = scenario();
        let fv = build_feature_vector(&raw, &compute_engineered_features(&raw));
        let value = serde_json::to_value(fv).unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.len(), 15);
        assert_eq!(map["Hillshade_9am"], 220.0);
    }

    #[test]
    fn feature_names_are_unique() {
        for (i, a) in FEATURE_NAMES.iter().enumerate() {
            assert!(!FEATURE_NAMES[i + 1..].contains(a), "duplicate feature name {a}");
        }
    }
}
