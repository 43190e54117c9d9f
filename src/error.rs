use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Startup errors – abort the dashboard before it renders
// ---------------------------------------------------------------------------

/// Failure to read the historical dataset into memory.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("cannot read dataset file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed JSON in {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed Parquet in {path}")]
    Parquet {
        path: PathBuf,
        #[source]
        source: parquet::errors::ParquetError,
    },

    #[error("dataset is missing required column '{column}'")]
    MissingColumn { column: String },

    #[error("row {row}: invalid value '{value}' in column '{column}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("unsupported dataset extension: .{0}")]
    UnsupportedFormat(String),
}

/// Failure to deserialize the fitted estimator artifact.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("cannot read model artifact {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupted model artifact {path}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported model artifact extension: .{0}")]
    UnsupportedFormat(String),

    #[error("unsupported model artifact version {0}")]
    UnsupportedVersion(u32),

    #[error("estimator '{0}' has no supported prediction capability")]
    UnsupportedEstimator(String),

    #[error("invalid model artifact: {0}")]
    Invalid(String),
}

// ---------------------------------------------------------------------------
// Pipeline errors
// ---------------------------------------------------------------------------

/// The dataset has no rows, so no selection domain can be derived.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("dataset is empty: no regions, conditions or years to select from")]
pub struct EmptyDatasetError;

/// The model's declared input columns differ from the feature schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("model expects columns {found:?} but features are built as {expected:?}")]
pub struct SchemaMismatchError {
    pub expected: Vec<String>,
    pub found: Vec<String>,
}

/// The model rejected a feature frame.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("category '{value}' was not seen for column '{column}' during training")]
    UnknownCategory { column: String, value: String },

    #[error("feature frame columns {found:?} do not match model columns {expected:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("feature frame has no column '{0}'")]
    MissingColumn(String),

    #[error("column '{column}' must be numeric for this model")]
    NonNumeric { column: String },

    #[error("model returned no prediction")]
    EmptyOutput,
}

/// Errors that abort a single interaction but leave the dashboard usable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    #[error(transparent)]
    EmptyDataset(#[from] EmptyDatasetError),

    #[error(transparent)]
    SchemaMismatch(#[from] SchemaMismatchError),

    #[error(transparent)]
    Prediction(#[from] PredictionError),
}
