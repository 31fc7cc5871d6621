//! User-entered terrain measurements for one prediction request.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The nine integer measurements a user sets with a slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Measurement {
    Elevation,
    Aspect,
    HillshadeMorning,
    HillshadeNoon,
    HillshadeEvening,
    DistanceToRoadways,
    DistanceToFirePoints,
    DistanceToHydrologyHorizontal,
    DistanceToHydrologyVertical,
}

impl Measurement {
    /// Slider order of the input form.
    pub const ALL: [Measurement; 9] = [
        Measurement::Elevation,
        Measurement::Aspect,
        Measurement::HillshadeMorning,
        Measurement::HillshadeNoon,
        Measurement::HillshadeEvening,
        Measurement::DistanceToRoadways,
        Measurement::DistanceToFirePoints,
        Measurement::DistanceToHydrologyHorizontal,
        Measurement::DistanceToHydrologyVertical,
    ];

    /// Column name in the training dataset.
    pub fn column(self) -> &'static str {
        match self {
            Measurement::Elevation                     => "Elevation",
            Measurement::Aspect                        => "Aspect",
            Measurement::HillshadeMorning              => "Hillshade_9am",
            Measurement::HillshadeNoon                 => "Hillshade_Noon",
            Measurement::HillshadeEvening              => "Hillshade_3pm",
            Measurement::DistanceToRoadways            => "Horizontal_Distance_To_Roadways",
            Measurement::DistanceToFirePoints          => "Horizontal_Distance_To_Fire_Points",
            Measurement::DistanceToHydrologyHorizontal => "Horizontal_Distance_To_Hydrology",
            Measurement::DistanceToHydrologyVertical   => "Vertical_Distance_To_Hydrology",
        }
    }

    /// Human-readable slider caption.
    pub fn caption(self) -> &'static str {
        match self {
            Measurement::Elevation                     => "Elevation (meters above sea level)",
            Measurement::Aspect                        => "Aspect (degrees)",
            Measurement::HillshadeMorning              => "Hillshade at 9am (0-255)",
            Measurement::HillshadeNoon                 => "Hillshade at Noon (0-255)",
            Measurement::HillshadeEvening              => "Hillshade at 3pm (0-255)",
            Measurement::DistanceToRoadways            => "Distance to Roadways (meters)",
            Measurement::DistanceToFirePoints          => "Distance to Fire Points (meters)",
            Measurement::DistanceToHydrologyHorizontal => "Distance to Hydrology (meters)",
            Measurement::DistanceToHydrologyVertical   => "Vertical Distance to Hydrology (meters)",
        }
    }
}

/// One submission of the input form.
///
/// Distances and elevation are non-negative in practice but not enforced;
/// vertical distance to hydrology is signed in the source data. The two
/// wilderness indicators travel as 0/1 on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawObservation {
    pub elevation: i32,
    pub aspect: i32,
    pub hillshade_morning: i32,
    pub hillshade_noon: i32,
    pub hillshade_evening: i32,
    pub distance_to_roadways: i32,
    pub distance_to_fire_points: i32,
    pub distance_to_hydrology_horizontal: i32,
    pub distance_to_hydrology_vertical: i32,
    #[serde(serialize_with = "flag_as_int", deserialize_with = "flag_from_int")]
    pub wilderness_area_1: bool,
    #[serde(serialize_with = "flag_as_int", deserialize_with = "flag_from_int")]
    pub wilderness_area_4: bool,
}

impl RawObservation {
    pub fn get(&self, m: Measurement) -> i32 {
        match m {
            Measurement::Elevation                     => self.elevation,
            Measurement::Aspect                        => self.aspect,
            Measurement::HillshadeMorning              => self.hillshade_morning,
            Measurement::HillshadeNoon                 => self.hillshade_noon,
            Measurement::HillshadeEvening              => self.hillshade_evening,
            Measurement::DistanceToRoadways            => self.distance_to_roadways,
            Measurement::DistanceToFirePoints          => self.distance_to_fire_points,
            Measurement::DistanceToHydrologyHorizontal => self.distance_to_hydrology_horizontal,
            Measurement::DistanceToHydrologyVertical   => self.distance_to_hydrology_vertical,
        }
    }

    pub fn set(&mut self, m: Measurement, value: i32) {
        let slot = match m {
            Measurement::Elevation                     => &mut self.elevation,
            Measurement::Aspect                        => &mut self.aspect,
            Measurement::HillshadeMorning              => &mut self.hillshade_morning,
            Measurement::HillshadeNoon                 => &mut self.hillshade_noon,
            Measurement::HillshadeEvening              => &mut self.hillshade_evening,
            Measurement::DistanceToRoadways            => &mut self.distance_to_roadways,
            Measurement::DistanceToFirePoints          => &mut self.distance_to_fire_points,
            Measurement::DistanceToHydrologyHorizontal => {
                &mut self.distance_to_hydrology_horizontal
            }
            Measurement::DistanceToHydrologyVertical   => &mut self.distance_to_hydrology_vertical,
        };
        *slot = value;
    }
}

// ── Serde helpers ─────────────────────────────────────────────────────────────

fn flag_as_int<S: Serializer>(flag: &bool, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u8(u8::from(*flag))
}

/// Accepts `0`, `1`, `false` or `true`.
fn flag_from_int<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    match Flag::deserialize(d)? {
        Flag::Bool(b) => Ok(b),
        Flag::Int(0) => Ok(false),
        Flag::Int(1) => Ok(true),
        Flag::Int(other) => Err(serde::de::Error::custom(format!(
            "wilderness indicator must be 0 or 1, got {other}"
        ))),
    }
}
