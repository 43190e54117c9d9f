use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    Array, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray, StringArray,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::errors::ParquetError;
use serde_json::{Map, Value as JsonValue};

use super::model::{
    Dataset, Observation, AREA_COLUMN, CONDITION_COLUMN, DATASET_COLUMNS, REGION_COLUMN,
    YEAR_COLUMN,
};
use crate::error::DataLoadError;

static NULL: JsonValue = JsonValue::Null;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the historical dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row naming the four dataset columns (extra columns ignored)
/// * `.json`    – `[{ "nama_kabupaten_kota": "...", "tahun": 2020, ... }, ...]`
/// * `.parquet` – one Arrow column per dataset column
pub fn load_dataset(path: &Path) -> Result<Dataset, DataLoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataLoadError::UnsupportedFormat(other.to_string())),
    };

    log::info!("Loaded {} observations from {}", dataset.len(), path.display());
    if let Some(first) = dataset.observations().first() {
        log::debug!("First observation: {first}");
    }
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one observation per record.
/// Columns are located by name, so order and extra columns do not matter.
fn load_csv(path: &Path) -> Result<Dataset, DataLoadError> {
    let csv_err = |source: csv::Error| DataLoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::Reader::from_reader(file);
    let headers = reader.headers().map_err(csv_err)?.clone();

    let position = |column: &str| {
        headers
            .iter()
            .position(|h| h.trim() == column)
            .ok_or_else(|| DataLoadError::MissingColumn {
                column: column.to_string(),
            })
    };
    let region_idx = position(REGION_COLUMN)?;
    let condition_idx = position(CONDITION_COLUMN)?;
    let year_idx = position(YEAR_COLUMN)?;
    let area_idx = position(AREA_COLUMN)?;

    let mut observations = Vec::new();

    for (row, result) in reader.records().enumerate() {
        let record = result.map_err(csv_err)?;
        let field = |idx: usize| record.get(idx).unwrap_or("");

        observations.push(Observation {
            region: parse_label(field(region_idx), row, REGION_COLUMN)?,
            condition: parse_label(field(condition_idx), row, CONDITION_COLUMN)?,
            year: parse_year(field(year_idx), row)?,
            area: parse_area(field(area_idx), row)?,
        });
    }

    Ok(Dataset::from_observations(observations))
}

fn invalid(row: usize, column: &str, value: impl ToString) -> DataLoadError {
    DataLoadError::InvalidValue {
        row,
        column: column.to_string(),
        value: value.to_string(),
    }
}

fn parse_label(s: &str, row: usize, column: &str) -> Result<String, DataLoadError> {
    if s.trim().is_empty() {
        return Err(invalid(row, column, s));
    }
    Ok(s.to_string())
}

/// Years written by Pandas from a float column look like `2020.0`; accept those.
fn parse_year(s: &str, row: usize) -> Result<i32, DataLoadError> {
    let tok = s.trim();
    if let Ok(year) = tok.parse::<i32>() {
        return Ok(year);
    }
    tok.parse::<f64>()
        .ok()
        .and_then(integral_year)
        .ok_or_else(|| invalid(row, YEAR_COLUMN, s))
}

fn parse_area(s: &str, row: usize) -> Result<f64, DataLoadError> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid(row, AREA_COLUMN, s))
}

fn integral_year(v: f64) -> Option<i32> {
    if v.fract() == 0.0 && v >= i32::MIN as f64 && v <= i32::MAX as f64 {
        Some(v as i32)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "nama_kabupaten_kota": "KABUPATEN BOGOR",
///     "kondisi_tanaman": "TANAMAN MENGHASILKAN",
///     "tahun": 2020,
///     "luas_tanaman": 1520.5
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Dataset, DataLoadError> {
    let file = std::fs::File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records: Vec<Map<String, JsonValue>> =
        serde_json::from_reader(std::io::BufReader::new(file)).map_err(|source| {
            DataLoadError::Json {
                path: path.to_path_buf(),
                source,
            }
        })?;

    if let Some(first) = records.first() {
        if let Some(column) = DATASET_COLUMNS.iter().find(|c| !first.contains_key(**c)) {
            return Err(DataLoadError::MissingColumn {
                column: column.to_string(),
            });
        }
    }

    let mut observations = Vec::with_capacity(records.len());

    for (row, obj) in records.iter().enumerate() {
        let get = |column: &str| obj.get(column).unwrap_or(&NULL);

        let label = |column: &str| match get(column) {
            JsonValue::String(s) => parse_label(s, row, column),
            other => Err(invalid(row, column, other)),
        };
        let year = match get(YEAR_COLUMN) {
            JsonValue::Number(n) => n
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .or_else(|| n.as_f64().and_then(integral_year))
                .ok_or_else(|| invalid(row, YEAR_COLUMN, n)),
            other => Err(invalid(row, YEAR_COLUMN, other)),
        }?;
        let area = get(AREA_COLUMN)
            .as_f64()
            .filter(|v| v.is_finite())
            .ok_or_else(|| invalid(row, AREA_COLUMN, get(AREA_COLUMN)))?;

        observations.push(Observation {
            region: label(REGION_COLUMN)?,
            condition: label(CONDITION_COLUMN)?,
            year,
            area,
        });
    }

    Ok(Dataset::from_observations(observations))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding the dataset.
///
/// Expected schema:
/// - `nama_kabupaten_kota`, `kondisi_tanaman`: Utf8 or LargeUtf8
/// - `tahun`: Int32 or Int64
/// - `luas_tanaman`: Float64, Float32, Int64 or Int32
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Dataset, DataLoadError> {
    let parquet_err = |source: ParquetError| DataLoadError::Parquet {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(parquet_err)?;
    let reader = builder.build().map_err(parquet_err)?;

    let mut observations = Vec::new();

    for batch_result in reader {
        let batch = batch_result.map_err(|e| parquet_err(ParquetError::ArrowError(e.to_string())))?;
        let offset = observations.len();

        let region_col = column(&batch, REGION_COLUMN)?;
        let condition_col = column(&batch, CONDITION_COLUMN)?;
        let year_col = column(&batch, YEAR_COLUMN)?;
        let area_col = column(&batch, AREA_COLUMN)?;

        for row in 0..batch.num_rows() {
            let global_row = offset + row;
            observations.push(Observation {
                region: extract_string(region_col, row, global_row, REGION_COLUMN)?,
                condition: extract_string(condition_col, row, global_row, CONDITION_COLUMN)?,
                year: extract_year(year_col, row, global_row)?,
                area: extract_area(area_col, row, global_row)?,
            });
        }
    }

    Ok(Dataset::from_observations(observations))
}

// -- Parquet / Arrow helpers --

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Arc<dyn Array>, DataLoadError> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| DataLoadError::MissingColumn {
            column: name.to_string(),
        })?;
    Ok(batch.column(idx))
}

fn extract_string(
    col: &Arc<dyn Array>,
    row: usize,
    global_row: usize,
    name: &str,
) -> Result<String, DataLoadError> {
    if col.is_null(row) {
        return Err(invalid(global_row, name, "null"));
    }
    let value = if let Some(arr) = col.as_any().downcast_ref::<StringArray>() {
        arr.value(row)
    } else if let Some(arr) = col.as_any().downcast_ref::<LargeStringArray>() {
        arr.value(row)
    } else {
        return Err(invalid(global_row, name, format!("{:?}", col.data_type())));
    };
    parse_label(value, global_row, name)
}

fn extract_year(col: &Arc<dyn Array>, row: usize, global_row: usize) -> Result<i32, DataLoadError> {
    if col.is_null(row) {
        return Err(invalid(global_row, YEAR_COLUMN, "null"));
    }
    let year = match col.data_type() {
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|arr| arr.value(row)),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .and_then(|arr| i32::try_from(arr.value(row)).ok()),
        _ => None,
    };
    year.ok_or_else(|| invalid(global_row, YEAR_COLUMN, format!("{:?}", col.data_type())))
}

fn extract_area(col: &Arc<dyn Array>, row: usize, global_row: usize) -> Result<f64, DataLoadError> {
    if col.is_null(row) {
        return Err(invalid(global_row, AREA_COLUMN, "null"));
    }
    let any = col.as_any();
    let area = match col.data_type() {
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(row)),
        DataType::Float32 => any.downcast_ref::<Float32Array>().map(|a| a.value(row) as f64),
        DataType::Int64 => any.downcast_ref::<Int64Array>().map(|a| a.value(row) as f64),
        DataType::Int32 => any.downcast_ref::<Int32Array>().map(|a| a.value(row) as f64),
        _ => None,
    };
    area.filter(|v| v.is_finite())
        .ok_or_else(|| invalid(global_row, AREA_COLUMN, format!("{:?}", col.data_type())))
}
