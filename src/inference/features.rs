use std::fmt;

use crate::data::domain::Selection;
use crate::data::model::{CONDITION_COLUMN, REGION_COLUMN, YEAR_COLUMN};
use crate::error::SchemaMismatchError;

// ---------------------------------------------------------------------------
// Declared model input schema
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Categorical,
    Integer,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Categorical => write!(f, "categorical"),
            ColumnKind::Integer => write!(f, "integer"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureColumn {
    pub name: &'static str,
    pub kind: ColumnKind,
}

/// Input columns of the regression model, in training order.
pub const FEATURE_SCHEMA: [FeatureColumn; 3] = [
    FeatureColumn {
        name: REGION_COLUMN,
        kind: ColumnKind::Categorical,
    },
    FeatureColumn {
        name: CONDITION_COLUMN,
        kind: ColumnKind::Categorical,
    },
    FeatureColumn {
        name: YEAR_COLUMN,
        kind: ColumnKind::Integer,
    },
];

pub fn schema_names() -> Vec<String> {
    FEATURE_SCHEMA.iter().map(|c| c.name.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Feature record / frame
// ---------------------------------------------------------------------------

/// A single cell of a feature frame, borrowed from its record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureValue<'a> {
    Text(&'a str),
    Integer(i64),
}

impl fmt::Display for FeatureValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Text(s) => write!(f, "{s}"),
            FeatureValue::Integer(i) => write!(f, "{i}"),
        }
    }
}

/// Observation-shaped model input without the area target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRecord {
    pub region: String,
    pub condition: String,
    pub year: i32,
}

impl FeatureRecord {
    /// Look up a cell by schema column name.
    pub fn value(&self, column: &str) -> Option<FeatureValue<'_>> {
        match column {
            REGION_COLUMN => Some(FeatureValue::Text(&self.region)),
            CONDITION_COLUMN => Some(FeatureValue::Text(&self.condition)),
            YEAR_COLUMN => Some(FeatureValue::Integer(self.year as i64)),
            _ => None,
        }
    }
}

/// Rows of feature records laid out under [`FEATURE_SCHEMA`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureFrame {
    columns: &'static [FeatureColumn],
    rows: Vec<FeatureRecord>,
}

impl FeatureFrame {
    pub fn from_records(rows: Vec<FeatureRecord>) -> Self {
        Self {
            columns: &FEATURE_SCHEMA,
            rows,
        }
    }

    pub fn columns(&self) -> &[FeatureColumn] {
        self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    pub fn rows(&self) -> &[FeatureRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builds single-row frames for a model whose input columns were checked
/// against [`FEATURE_SCHEMA`] when the builder was created.
#[derive(Debug, Clone)]
pub struct FeatureBuilder {
    columns: &'static [FeatureColumn],
}

impl FeatureBuilder {
    /// Fails if `model_columns` differ from the schema in name or order.
    pub fn new<S: AsRef<str>>(model_columns: &[S]) -> Result<Self, SchemaMismatchError> {
        let matches = model_columns.len() == FEATURE_SCHEMA.len()
            && model_columns
                .iter()
                .zip(FEATURE_SCHEMA.iter())
                .all(|(found, expected)| found.as_ref() == expected.name);

        if !matches {
            return Err(SchemaMismatchError {
                expected: schema_names(),
                found: model_columns
                    .iter()
                    .map(|c| c.as_ref().to_string())
                    .collect(),
            });
        }
        Ok(Self {
            columns: &FEATURE_SCHEMA,
        })
    }

    /// One-row frame for the given inputs.
    ///
    /// Domain membership is not checked and the year is not clamped; a year
    /// outside the training range is passed through for the model to
    /// extrapolate.
    pub fn build(&self, region: &str, condition: &str, year: i32) -> FeatureFrame {
        FeatureFrame {
            columns: self.columns,
            rows: vec![FeatureRecord {
                region: region.to_string(),
                condition: condition.to_string(),
                year,
            }],
        }
    }

    pub fn build_from(&self, selection: &Selection) -> FeatureFrame {
        self.build(&selection.region, &selection.condition, selection.year)
    }
}
