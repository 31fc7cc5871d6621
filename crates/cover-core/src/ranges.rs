//! Slider bounds derived from the training dataset.
//!
//! Every measured column gets `min`, `max` and a `default` equal to the
//! column mean. All three are truncated toward zero, as integer sliders are.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use serde::Serialize;
use thiserror::Error;

use crate::observation::{Measurement, RawObservation};

#[derive(Debug, Error)]
pub enum RangeError {
    #[error("failed to open dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read dataset: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset has no column {0:?}")]
    MissingColumn(&'static str),
    #[error("row {row}, column {column:?}: {value:?} is not a finite number")]
    BadValue {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("dataset has no rows")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SliderRange {
    pub min: i32,
    pub max: i32,
    pub default: i32,
}

impl SliderRange {
    pub fn contains(&self, v: i32) -> bool {
        (self.min..=self.max).contains(&v)
    }

    pub fn clamp(&self, v: i32) -> i32 {
        v.clamp(self.min, self.max)
    }
}

/// Running min/max/sum for one column.
#[derive(Clone, Copy)]
struct ColumnStats {
    min: f64,
    max: f64,
    sum: f64,
}

impl ColumnStats {
    fn new() -> Self {
        Self { min: f64::INFINITY, max: f64::NEG_INFINITY, sum: 0.0 }
    }

    fn push(&mut self, v: f64) {
        self.min = self.min.min(v);
        self.max = self.max.max(v);
        self.sum += v;
    }

    fn finish(self, n: usize) -> SliderRange {
        SliderRange {
            min: self.min.trunc() as i32,
            max: self.max.trunc() as i32,
            default: (self.sum / n as f64).trunc() as i32,
        }
    }
}

/// Slider bounds for all nine measurements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementRanges {
    ranges: HashMap<Measurement, SliderRange>,
}

impl MeasurementRanges {
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self, RangeError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|source| RangeError::Io { path: path.to_path_buf(), source })?;
        let ranges = Self::from_reader(file)?;
        tracing::debug!(path = %path.display(), "slider ranges computed");
        Ok(ranges)
    }

    /// Read a headed CSV. Columns other than the nine measurements are ignored.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RangeError> {
        let mut rdr = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let headers = rdr.headers()?.clone();
        let mut columns = Vec::with_capacity(Measurement::ALL.len());
        for m in Measurement::ALL {
            let idx = headers
                .iter()
                .position(|h| h == m.column())
                .ok_or(RangeError::MissingColumn(m.column()))?;
            columns.push((m, idx));
        }

        let mut stats = [ColumnStats::new(); 9];
        let mut n_rows = 0usize;
        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            for (slot, &(m, idx)) in stats.iter_mut().zip(&columns) {
                let cell = record.get(idx).unwrap_or("");
                let v = cell.parse::<f64>().ok().filter(|v| v.is_finite()).ok_or_else(|| {
                    RangeError::BadValue {
                        row: row + 1,
                        column: m.column(),
                        value: cell.to_string(),
                    }
                })?;
                slot.push(v);
            }
            n_rows += 1;
        }
        if n_rows == 0 {
            return Err(RangeError::Empty);
        }

        let ranges = columns
            .iter()
            .zip(stats)
            .map(|(&(m, _), s)| (m, s.finish(n_rows)))
            .collect();
        Ok(Self { ranges })
    }

    pub fn get(&self, m: Measurement) -> SliderRange {
        self.ranges[&m]
    }

    /// Form state before the user touches anything: every slider at its
    /// default, both wilderness selectors on 0.
    pub fn default_observation(&self) -> RawObservation {
        let mut raw = RawObservation::default();
        for m in Measurement::ALL {
            raw.set(m, self.get(m).default);
        }
        raw
    }

    /// Clamp every measurement into its slider range. Returns the clamped
    /// observation and the measurements that had to move.
    pub fn clamp(&self, raw: &RawObservation) -> (RawObservation, Vec<Measurement>) {
        let mut out = *raw;
        let mut moved = Vec::new();
        for m in Measurement::ALL {
            let range = self.get(m);
            let v = raw.get(m);
            if !range.contains(v) {
                out.set(m, range.clamp(v));
                moved.push(m);
            }
        }
        (out, moved)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Measurement, SliderRange)> + '_ {
        Measurement::ALL.into_iter().map(move |m| (m, self.get(m)))
    }
}
