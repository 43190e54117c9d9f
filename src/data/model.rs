use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Column names of the source table
// ---------------------------------------------------------------------------

pub const REGION_COLUMN: &str = "nama_kabupaten_kota";
pub const CONDITION_COLUMN: &str = "kondisi_tanaman";
pub const YEAR_COLUMN: &str = "tahun";
pub const AREA_COLUMN: &str = "luas_tanaman";

/// All columns a dataset file must provide, in display order.
pub const DATASET_COLUMNS: [&str; 4] = [REGION_COLUMN, CONDITION_COLUMN, YEAR_COLUMN, AREA_COLUMN];

// ---------------------------------------------------------------------------
// Observation – one row of the dataset
// ---------------------------------------------------------------------------

/// A single historical measurement of cultivated area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Regency or city name.
    #[serde(rename = "nama_kabupaten_kota")]
    pub region: String,
    /// Plant condition label.
    #[serde(rename = "kondisi_tanaman")]
    pub condition: String,
    #[serde(rename = "tahun")]
    pub year: i32,
    /// Cultivated area in hectares.
    #[serde(rename = "luas_tanaman")]
    pub area: f64,
}

impl Observation {
    pub fn new(region: &str, condition: &str, year: i32, area: f64) -> Self {
        Self {
            region: region.to_string(),
            condition: condition.to_string(),
            year,
            area,
        }
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} / {}: {:.2} ha",
            self.region, self.condition, self.year, self.area
        )
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset. Rows keep file order and are never mutated.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    observations: Vec<Observation>,
}

impl Dataset {
    pub fn from_observations(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// The first `n` rows (fewer if the table is shorter).
    pub fn head(&self, n: usize) -> &[Observation] {
        &self.observations[..n.min(self.observations.len())]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
