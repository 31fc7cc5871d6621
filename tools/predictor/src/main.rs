//! Command-line form for the forest cover-type classifier.
//!
//! Slider bounds and defaults come from the training CSV; any measurement
//! not given on the command line stays at its default (the column mean).

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use cover_core::{
    LabelEncoder, Measurement, MeasurementRanges, Prediction, Predictor, RandomForest,
    RawObservation,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

// ── CLI ──────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "predictor",
    about = "Predict the forest cover type for a set of terrain measurements",
    allow_negative_numbers = true
)]
struct Args {
    /// Random-forest model artifact (JSON)
    #[arg(long, default_value = "models/best_rf_model.json")]
    model: PathBuf,

    /// Label encoder artifact (JSON); labels are used as-is when absent
    #[arg(long, default_value = "models/label_encoder.json")]
    encoder: PathBuf,

    /// Training dataset used for slider bounds and defaults
    #[arg(long, default_value = "data/cleaned_cover_type.csv")]
    data: PathBuf,

    /// Elevation (meters above sea level)
    #[arg(long)]
    elevation: Option<i32>,

    /// Aspect (degrees)
    #[arg(long)]
    aspect: Option<i32>,

    /// Hillshade at 9am (0-255)
    #[arg(long = "hillshade-9am")]
    hillshade_9am: Option<i32>,

    /// Hillshade at noon (0-255)
    #[arg(long)]
    hillshade_noon: Option<i32>,

    /// Hillshade at 3pm (0-255)
    #[arg(long = "hillshade-3pm")]
    hillshade_3pm: Option<i32>,

    /// Distance to roadways (meters)
    #[arg(long)]
    distance_to_roadways: Option<i32>,

    /// Distance to fire points (meters)
    #[arg(long)]
    distance_to_fire_points: Option<i32>,

    /// Horizontal distance to hydrology (meters)
    #[arg(long)]
    distance_to_hydrology: Option<i32>,

    /// Vertical distance to hydrology (meters, may be negative)
    #[arg(long)]
    vertical_distance_to_hydrology: Option<i32>,

    /// Is wilderness area Rawah present? (0 or 1)
    #[arg(
        long = "wilderness-area-1",
        default_value = "0",
        value_parser = clap::value_parser!(u8).range(0..=1)
    )]
    wilderness_area_1: u8,

    /// Is wilderness area Cache la Poudre present? (0 or 1)
    #[arg(
        long = "wilderness-area-4",
        default_value = "0",
        value_parser = clap::value_parser!(u8).range(0..=1)
    )]
    wilderness_area_4: u8,

    /// Print slider bounds and defaults, then exit
    #[arg(long)]
    show_ranges: bool,

    /// Print the full prediction as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    fn overrides(&self) -> [(Measurement, Option<i32>); 9] {
        [
            (Measurement::Elevation, self.elevation),
            (Measurement::Aspect, self.aspect),
            (Measurement::HillshadeMorning, self.hillshade_9am),
            (Measurement::HillshadeNoon, self.hillshade_noon),
            (Measurement::HillshadeEvening, self.hillshade_3pm),
            (Measurement::DistanceToRoadways, self.distance_to_roadways),
            (Measurement::DistanceToFirePoints, self.distance_to_fire_points),
            (Measurement::DistanceToHydrologyHorizontal, self.distance_to_hydrology),
            (Measurement::DistanceToHydrologyVertical, self.vertical_distance_to_hydrology),
        ]
    }

    /// Form state: defaults from the dataset, overridden by flags, clamped to the sliders.
    fn observation(&self, ranges: &MeasurementRanges) -> RawObservation {
        let mut raw = ranges.default_observation();
        for (m, value) in self.overrides() {
            if let Some(v) = value {
                raw.set(m, v);
            }
        }
        raw.wilderness_area_1 = self.wilderness_area_1 == 1;
        raw.wilderness_area_4 = self.wilderness_area_4 == 1;

        let (clamped, moved) = ranges.clamp(&raw);
        for m in moved {
            let range = ranges.get(m);
            warn!(
                measurement = m.column(),
                given = raw.get(m),
                min = range.min,
                max = range.max,
                used = clamped.get(m),
                "value outside slider range, clamped"
            );
        }
        clamped
    }
}

// ── Artifact loading ─────────────────────────────────────────────────────────

/// A missing or unreadable encoder is not fatal: labels are then shown as-is.
fn load_encoder(path: &Path) -> Option<LabelEncoder> {
    if !path.exists() {
        info!(path = %path.display(), "no label encoder, using classifier labels directly");
        return None;
    }
    match LabelEncoder::from_json_file(path) {
        Ok(enc) => Some(enc),
        Err(err) => {
            warn!(
                path = %path.display(),
                error = %err,
                "label encoder unreadable, using classifier labels directly"
            );
            None
        }
    }
}

// ── Output ───────────────────────────────────────────────────────────────────

fn render_ranges(ranges: &MeasurementRanges) -> String {
    let mut out = format!("{:<42} {:>8} {:>8} {:>8}\n", "Measurement", "min", "max", "default");
    for (m, r) in ranges.iter() {
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{:<42} {:>8} {:>8} {:>8}", m.caption(), r.min, r.max, r.default);
    }
    out
}

fn render_prediction(prediction: &Prediction, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(prediction)? + "\n");
    }
    Ok(format!(
        "Selected Wilderness Area(s): {}\nPredicted Forest Cover Type: {}\n",
        prediction.wilderness, prediction.cover_type
    ))
}

// ── Main ─────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let ranges = MeasurementRanges::from_csv(&args.data)
        .with_context(|| format!("Failed to compute slider ranges from {}", args.data.display()))?;

    if args.show_ranges {
        print!("{}", render_ranges(&ranges));
        return Ok(());
    }

    let forest = RandomForest::from_json_file(&args.model)
        .with_context(|| format!("Failed to load model {}", args.model.display()))?;
    info!(trees = forest.n_trees(), classes = forest.classes().len(), "model loaded");

    let mut predictor = Predictor::new(Box::new(forest));
    if let Some(encoder) = load_encoder(&args.encoder) {
        predictor = predictor.with_decoder(Box::new(encoder));
    }

    let raw = args.observation(&ranges);
    let prediction = predictor.evaluate(&raw).context("Prediction failed")?;
    info!(label = prediction.label, decoded = predictor.has_decoder(), "prediction made");

    print!("{}", render_prediction(&prediction, args.json)?);

    Ok(())
}
