use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use luas_tanaman::data::model::{
    Observation, AREA_COLUMN, CONDITION_COLUMN, REGION_COLUMN, YEAR_COLUMN,
};
use luas_tanaman::inference::artifact::{
    ArtifactDocument, EncoderSpec, HandleUnknown, ARTIFACT_FORMAT_VERSION, LINEAR_REGRESSION,
};
use luas_tanaman::inference::features::FEATURE_SCHEMA;

/// Base area (ha) per region in the first year.
const REGIONS: [(&str, f64); 10] = [
    ("KABUPATEN BANDUNG", 1450.0),
    ("KABUPATEN BOGOR", 1320.0),
    ("KABUPATEN CIANJUR", 1180.0),
    ("KABUPATEN GARUT", 990.0),
    ("KABUPATEN SUKABUMI", 870.0),
    ("KABUPATEN TASIKMALAYA", 760.0),
    ("KABUPATEN KUNINGAN", 540.0),
    ("KABUPATEN MAJALENGKA", 480.0),
    ("KOTA BANDUNG", 320.0),
    ("KOTA BOGOR", 300.0),
];

/// Additive effect (ha) per plant condition.
const CONDITIONS: [(&str, f64); 3] = [
    ("TANAMAN BELUM MENGHASILKAN", 0.0),
    ("TANAMAN MENGHASILKAN", 400.0),
    ("TANAMAN RUSAK", -150.0),
];

const FIRST_YEAR: i32 = 2015;
const LAST_YEAR: i32 = 2022;
/// Yearly change (ha / year).
const SLOPE: f64 = 12.0;
const NOISE: f64 = 25.0;

/// Seeded SplitMix64 stream with Gaussian sampling for measurement noise.
struct NoiseSource {
    state: u64,
}

impl NoiseSource {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform in `(0, 1]`, so the logarithm below stays finite.
    fn unit(&mut self) -> f64 {
        ((self.next_u64() >> 11) + 1) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller draw from `N(mean, std_dev²)`.
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        let radius = (-2.0 * self.unit().ln()).sqrt();
        let angle = std::f64::consts::TAU * self.unit();
        mean + std_dev * radius * angle.cos()
    }
}

fn generate_observations(noise: &mut NoiseSource) -> Vec<Observation> {
    let mut rows = Vec::new();
    for year in FIRST_YEAR..=LAST_YEAR {
        for &(region, base) in &REGIONS {
            for &(condition, effect) in &CONDITIONS {
                let expected = base + effect + SLOPE * (year - FIRST_YEAR) as f64;
                let area = (noise.normal(expected, NOISE) * 100.0).round() / 100.0;
                rows.push(Observation::new(region, condition, year, area.max(0.0)));
            }
        }
    }
    rows
}

/// Parameters of the generating process, laid out as a model artifact.
fn generating_model() -> ArtifactDocument {
    let mut coefficients: Vec<f64> = REGIONS.iter().map(|&(_, base)| base).collect();
    coefficients.extend(CONDITIONS.iter().map(|&(_, effect)| effect));
    coefficients.push(SLOPE);

    ArtifactDocument {
        format_version: ARTIFACT_FORMAT_VERSION,
        estimator: LINEAR_REGRESSION.to_string(),
        target: Some(AREA_COLUMN.to_string()),
        feature_names: FEATURE_SCHEMA.iter().map(|c| c.name.to_string()).collect(),
        encoders: vec![
            EncoderSpec {
                column: REGION_COLUMN.to_string(),
                categories: REGIONS.iter().map(|(r, _)| r.to_string()).collect(),
                handle_unknown: HandleUnknown::Error,
            },
            EncoderSpec {
                column: CONDITION_COLUMN.to_string(),
                categories: CONDITIONS.iter().map(|(c, _)| c.to_string()).collect(),
                handle_unknown: HandleUnknown::Error,
            },
        ],
        coefficients,
        intercept: -SLOPE * FIRST_YEAR as f64,
    }
}

fn write_csv(path: &str, rows: &[Observation]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &str, rows: &[Observation]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new(REGION_COLUMN, DataType::Utf8, false),
        Field::new(CONDITION_COLUMN, DataType::Utf8, false),
        Field::new(YEAR_COLUMN, DataType::Int32, false),
        Field::new(AREA_COLUMN, DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.region.as_str()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.condition.as_str()))),
            Arc::new(Int32Array::from_iter_values(rows.iter().map(|r| r.year))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.area))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut noise = NoiseSource::new(42);
    let rows = generate_observations(&mut noise);

    write_csv("luastanaman.csv", &rows)?;
    write_parquet("luastanaman.parquet", &rows)?;

    let model_path = "model_luas_tanaman.json";
    let file = std::fs::File::create(model_path).with_context(|| format!("creating {model_path}"))?;
    serde_json::to_writer_pretty(file, &generating_model()).context("writing model artifact")?;

    println!(
        "Wrote {} observations to luastanaman.csv / luastanaman.parquet and {model_path}",
        rows.len()
    );
    Ok(())
}
