//! Display decoding for classifier labels and wilderness indicators.

use serde::Serialize;

use crate::model::Label;

/// The seven canonical forest cover types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CoverType {
    SpruceFir,
    LodgepolePine,
    PonderosaPine,
    CottonwoodWillow,
    Aspen,
    DouglasFir,
    Krummholz,
}

/// Cover-type code → species name.
const COVER_TYPES: [(Label, CoverType, &str); 7] = [
    (1, CoverType::SpruceFir,        "Spruce/Fir"),
    (2, CoverType::LodgepolePine,    "Lodgepole Pine"),
    (3, CoverType::PonderosaPine,    "Ponderosa Pine"),
    (4, CoverType::CottonwoodWillow, "Cottonwood/Willow"),
    (5, CoverType::Aspen,            "Aspen"),
    (6, CoverType::DouglasFir,       "Douglas-fir"),
    (7, CoverType::Krummholz,        "Krummholz"),
];

/// Indicator column → wilderness area name, in display order.
const WILDERNESS_AREAS: [(&str, &str); 2] = [
    ("Wilderness_Area_1", "Rawah"),
    ("Wilderness_Area_4", "Cache la Poudre"),
];

const WILDERNESS_SEPARATOR: &str = ", ";
const NO_WILDERNESS: &str = "None";

impl CoverType {
    pub const ALL: [CoverType; 7] = [
        CoverType::SpruceFir,
        CoverType::LodgepolePine,
        CoverType::PonderosaPine,
        CoverType::CottonwoodWillow,
        CoverType::Aspen,
        CoverType::DouglasFir,
        CoverType::Krummholz,
    ];

    pub fn from_label(label: Label) -> Option<Self> {
        COVER_TYPES.iter().find(|(code, _, _)| *code == label).map(|&(_, ct, _)| ct)
    }

    pub fn code(self) -> Label {
        COVER_TYPES.iter().find(|(_, ct, _)| *ct == self).map_or(0, |&(code, _, _)| code)
    }

    pub fn name(self) -> &'static str {
        COVER_TYPES.iter().find(|(_, ct, _)| *ct == self).map_or("", |&(_, _, name)| name)
    }
}

/// Species name for a decoded label, or `"Type {label}"` when unknown.
pub fn decode_cover_type(label: Label) -> String {
    match CoverType::from_label(label) {
        Some(ct) => ct.name().to_string(),
        None => format!("Type {label}"),
    }
}

/// Names of the selected wilderness areas joined for display, `"None"` if neither.
pub fn describe_wilderness_areas(area_1: bool, area_4: bool) -> String {
    let selected: Vec<&str> = WILDERNESS_AREAS
        .iter()
        .zip([area_1, area_4])
        .filter(|(_, present)| *present)
        .map(|(&(_, name), _)| name)
        .collect();

    if selected.is_empty() {
        NO_WILDERNESS.to_string()
    } else {
        selected.join(WILDERNESS_SEPARATOR)
    }
}
