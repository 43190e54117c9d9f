use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::features::{FeatureFrame, FeatureRecord, FeatureValue};
use crate::error::{ModelLoadError, PredictionError};

/// Artifact layout version understood by [`load_model`].
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Estimator tag of the only supported artifact kind.
pub const LINEAR_REGRESSION: &str = "linear_regression";

// ---------------------------------------------------------------------------
// Prediction capability
// ---------------------------------------------------------------------------

/// A fitted estimator that maps feature frames to one prediction per row.
///
/// Implementations are immutable after construction and shared read-only.
pub trait Regressor: Send + Sync {
    /// Input column names, in the order used during training.
    fn feature_names(&self) -> &[String];

    /// Name of the predicted column, when the estimator records one.
    fn target(&self) -> Option<&str> {
        None
    }

    fn predict(&self, frame: &FeatureFrame) -> Result<Vec<f64>, PredictionError>;
}

// ---------------------------------------------------------------------------
// On-disk document
// ---------------------------------------------------------------------------

/// What to do with a category that was not seen during training.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    /// Reject the row with [`PredictionError::UnknownCategory`].
    #[default]
    Error,
    /// Encode the row as all-zero indicators for that column.
    Ignore,
}

/// One-hot encoding of a single categorical column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncoderSpec {
    pub column: String,
    pub categories: Vec<String>,
    #[serde(default)]
    pub handle_unknown: HandleUnknown,
}

/// Serialized one-hot + linear regression pipeline.
///
/// The design vector walks `feature_names` in order: an encoded column
/// contributes one indicator per category, any other column is passed
/// through as a single numeric value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactDocument {
    pub format_version: u32,
    pub estimator: String,
    #[serde(default)]
    pub target: Option<String>,
    pub feature_names: Vec<String>,
    #[serde(default)]
    pub encoders: Vec<EncoderSpec>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Deserialize a model artifact from disk.  Dispatch by extension.
pub fn load_model(path: &Path) -> Result<LinearModelArtifact, ModelLoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "json" {
        return Err(ModelLoadError::UnsupportedFormat(ext));
    }

    let file = std::fs::File::open(path).map_err(|source| ModelLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document: ArtifactDocument = serde_json::from_reader(std::io::BufReader::new(file))
        .map_err(|source| ModelLoadError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

    let model = LinearModelArtifact::from_document(document)?;
    log::info!(
        "Loaded {} model from {} ({} features, {} coefficients)",
        LINEAR_REGRESSION,
        path.display(),
        model.feature_names.len(),
        model.coefficients.len()
    );
    Ok(model)
}

// ---------------------------------------------------------------------------
// Linear model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum FeatureBlock {
    OneHot {
        categories: Vec<String>,
        handle_unknown: HandleUnknown,
    },
    Passthrough,
}

impl FeatureBlock {
    fn width(&self) -> usize {
        match self {
            FeatureBlock::OneHot { categories, .. } => categories.len(),
            FeatureBlock::Passthrough => 1,
        }
    }
}

/// A validated, ready-to-use linear regression pipeline.
#[derive(Debug, Clone)]
pub struct LinearModelArtifact {
    target: Option<String>,
    feature_names: Vec<String>,
    blocks: Vec<FeatureBlock>,
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearModelArtifact {
    /// Check a decoded document for internal consistency.
    pub fn from_document(doc: ArtifactDocument) -> Result<Self, ModelLoadError> {
        if doc.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ModelLoadError::UnsupportedVersion(doc.format_version));
        }
        if doc.estimator != LINEAR_REGRESSION {
            return Err(ModelLoadError::UnsupportedEstimator(doc.estimator));
        }
        if doc.feature_names.is_empty() {
            return Err(ModelLoadError::Invalid("no feature names".into()));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = doc.feature_names.iter().find(|n| !seen.insert(n.as_str())) {
            return Err(ModelLoadError::Invalid(format!("duplicate feature '{dup}'")));
        }

        let mut encoders = doc.encoders;
        let mut blocks = Vec::with_capacity(doc.feature_names.len());
        for name in &doc.feature_names {
            let mut matching = encoders.iter().filter(|e| &e.column == name);
            if matching.next().is_some() && matching.next().is_some() {
                return Err(ModelLoadError::Invalid(format!(
                    "more than one encoder for '{name}'"
                )));
            }
            match encoders.iter().position(|e| &e.column == name) {
                Some(idx) => {
                    let encoder = encoders.swap_remove(idx);
                    validate_categories(&encoder)?;
                    blocks.push(FeatureBlock::OneHot {
                        categories: encoder.categories,
                        handle_unknown: encoder.handle_unknown,
                    });
                }
                None => blocks.push(FeatureBlock::Passthrough),
            }
        }
        if let Some(orphan) = encoders.first() {
            return Err(ModelLoadError::Invalid(format!(
                "encoder for unknown column '{}'",
                orphan.column
            )));
        }

        let width: usize = blocks.iter().map(FeatureBlock::width).sum();
        if doc.coefficients.len() != width {
            return Err(ModelLoadError::Invalid(format!(
                "expected {width} coefficients, found {}",
                doc.coefficients.len()
            )));
        }
        if !doc.intercept.is_finite() || doc.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ModelLoadError::Invalid("non-finite parameter".into()));
        }

        Ok(Self {
            target: doc.target,
            feature_names: doc.feature_names,
            blocks,
            coefficients: doc.coefficients,
            intercept: doc.intercept,
        })
    }

    /// Expand one record into the design vector.
    fn design_row(&self, record: &FeatureRecord) -> Result<Vec<f64>, PredictionError> {
        let mut row = Vec::with_capacity(self.coefficients.len());

        for (name, block) in self.feature_names.iter().zip(&self.blocks) {
            let value = record
                .value(name)
                .ok_or_else(|| PredictionError::MissingColumn(name.clone()))?;

            match block {
                FeatureBlock::OneHot {
                    categories,
                    handle_unknown,
                } => {
                    let label = value.to_string();
                    let hit = categories.iter().position(|c| *c == label);
                    if hit.is_none() {
                        match handle_unknown {
                            HandleUnknown::Error => {
                                return Err(PredictionError::UnknownCategory {
                                    column: name.clone(),
                                    value: label,
                                })
                            }
                            HandleUnknown::Ignore => {
                                log::warn!("Unseen category '{label}' for '{name}' encoded as zeros");
                            }
                        }
                    }
                    row.extend((0..categories.len()).map(|i| if Some(i) == hit { 1.0 } else { 0.0 }));
                }
                FeatureBlock::Passthrough => match value {
                    FeatureValue::Integer(v) => row.push(v as f64),
                    FeatureValue::Text(_) => {
                        return Err(PredictionError::NonNumeric {
                            column: name.clone(),
                        })
                    }
                },
            }
        }
        Ok(row)
    }
}

fn validate_categories(encoder: &EncoderSpec) -> Result<(), ModelLoadError> {
    if encoder.categories.is_empty() {
        return Err(ModelLoadError::Invalid(format!(
            "encoder for '{}' has no categories",
            encoder.column
        )));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = encoder.categories.iter().find(|c| !seen.insert(c.as_str())) {
        return Err(ModelLoadError::Invalid(format!(
            "duplicate category '{dup}' for '{}'",
            encoder.column
        )));
    }
    Ok(())
}

impl Regressor for LinearModelArtifact {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    fn predict(&self, frame: &FeatureFrame) -> Result<Vec<f64>, PredictionError> {
        let found = frame.column_names();
        if found.len() != self.feature_names.len()
            || found.iter().zip(&self.feature_names).any(|(f, e)| *f != e.as_str())
        {
            return Err(PredictionError::SchemaMismatch {
                expected: self.feature_names.clone(),
                found: found.iter().map(|s| s.to_string()).collect(),
            });
        }

        frame
            .rows()
            .iter()
            .map(|record| -> Result<f64, PredictionError> {
                let x = self.design_row(record)?;
                let dot: f64 = x.iter().zip(&self.coefficients).map(|(a, b)| a * b).sum();
                Ok(self.intercept + dot)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::features::FEATURE_SCHEMA;
    use std::io::Write;

    /// Regions [Bandung, Bogor], conditions [Baik, Rusak], slope 2 per year.
    fn document(handle_unknown: HandleUnknown) -> ArtifactDocument {
        ArtifactDocument {
            format_version: ARTIFACT_FORMAT_VERSION,
            estimator: LINEAR_REGRESSION.to_string(),
            target: Some("luas_tanaman".to_string()),
            feature_names: FEATURE_SCHEMA.iter().map(|c| c.name.to_string()).collect(),
            encoders: vec![
                EncoderSpec {
                    column: "nama_kabupaten_kota".to_string(),
                    categories: vec!["Bandung".to_string(), "Bogor".to_string()],
                    handle_unknown,
                },
                EncoderSpec {
                    column: "kondisi_tanaman".to_string(),
                    categories: vec!["Baik".to_string(), "Rusak".to_string()],
                    handle_unknown: HandleUnknown::Error,
                },
            ],
            coefficients: vec![100.0, 50.0, 10.0, -10.0, 2.0],
            intercept: -4000.0,
        }
    }

    fn frame(region: &str, condition: &str, year: i32) -> FeatureFrame {
        FeatureFrame::from_records(vec![FeatureRecord {
            region: region.to_string(),
            condition: condition.to_string(),
            year,
        }])
    }

    #[test]
    fn test_predict_linear_combination() {
        let model = LinearModelArtifact::from_document(document(HandleUnknown::Error)).unwrap();
        // -4000 + 100 (Bandung) + 10 (Baik) + 2 * 2020
        assert_eq!(model.predict(&frame("Bandung", "Baik", 2020)).unwrap(), vec![150.0]);
        // -4000 + 50 (Bogor) - 10 (Rusak) + 2 * 2021
        assert_eq!(model.predict(&frame("Bogor", "Rusak", 2021)).unwrap(), vec![82.0]);
    }

    #[test]
    fn test_predict_one_output_per_row() {
        let model = LinearModelArtifact::from_document(document(HandleUnknown::Error)).unwrap();
        let rows = vec![
            FeatureRecord {
                region: "Bandung".into(),
                condition: "Baik".into(),
                year: 2020,
            },
            FeatureRecord {
                region: "Bogor".into(),
                condition: "Baik".into(),
                year: 2020,
            },
        ];
        let out = model.predict(&FeatureFrame::from_records(rows)).unwrap();
        assert_eq!(out, vec![150.0, 100.0]);
    }

    #[test]
    fn test_year_outside_training_range_extrapolates() {
        let model = LinearModelArtifact::from_document(document(HandleUnknown::Error)).unwrap();
        let near = model.predict(&frame("Bandung", "Baik", 2020)).unwrap()[0];
        let far = model.predict(&frame("Bandung", "Baik", 2030)).unwrap()[0];
        assert_eq!(far - near, 20.0);
    }

    #[test]
    fn test_unknown_category_rejected() {
        let model = LinearModelArtifact::from_document(document(HandleUnknown::Error)).unwrap();
        let err = model.predict(&frame("Atlantis", "Baik", 2020)).unwrap_err();
        assert_eq!(
            err,
            PredictionError::UnknownCategory {
                column: "nama_kabupaten_kota".to_string(),
                value: "Atlantis".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_category_ignored_as_zeros() {
        let model = LinearModelArtifact::from_document(document(HandleUnknown::Ignore)).unwrap();
        // -4000 + 0 (unknown region) + 10 (Baik) + 2 * 2020
        assert_eq!(model.predict(&frame("Atlantis", "Baik", 2020)).unwrap(), vec![50.0]);
    }

    #[test]
    fn test_feature_names_follow_document() {
        let model = LinearModelArtifact::from_document(document(HandleUnknown::Error)).unwrap();
        assert_eq!(model.feature_names(), &["nama_kabupaten_kota", "kondisi_tanaman", "tahun"]);
        assert_eq!(model.target(), Some("luas_tanaman"));
    }

    #[test]
    fn test_frame_with_other_column_order_is_rejected() {
        let mut doc = document(HandleUnknown::Error);
        doc.feature_names.swap(0, 1);
        let model = LinearModelArtifact::from_document(doc).unwrap();
        assert!(matches!(
            model.predict(&frame("Bandung", "Baik", 2020)),
            Err(PredictionError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_categorical_passthrough_is_non_numeric() {
        let mut doc = document(HandleUnknown::Error);
        doc.encoders.remove(1);
        doc.coefficients = vec![100.0, 50.0, 1.0, 2.0];
        let model = LinearModelArtifact::from_document(doc).unwrap();
        assert_eq!(
            model.predict(&frame("Bandung", "Baik", 2020)).unwrap_err(),
            PredictionError::NonNumeric {
                column: "kondisi_tanaman".to_string()
            }
        );
    }

    #[test]
    fn test_coefficient_count_mismatch() {
        let mut doc = document(HandleUnknown::Error);
        doc.coefficients.pop();
        assert!(matches!(
            LinearModelArtifact::from_document(doc),
            Err(ModelLoadError::Invalid(msg)) if msg.contains("expected 5 coefficients")
        ));
    }

    #[test]
    fn test_rejects_inconsistent_documents() {
        let mut doc = document(HandleUnknown::Error);
        doc.estimator = "random_forest".to_string();
        assert!(matches!(
            LinearModelArtifact::from_document(doc),
            Err(ModelLoadError::UnsupportedEstimator(_))
        ));

        let mut doc = document(HandleUnknown::Error);
        doc.format_version = 7;
        assert!(matches!(
            LinearModelArtifact::from_document(doc),
            Err(ModelLoadError::UnsupportedVersion(7))
        ));

        let mut doc = document(HandleUnknown::Error);
        doc.encoders[0].column = "provinsi".to_string();
        assert!(matches!(
            LinearModelArtifact::from_document(doc),
            Err(ModelLoadError::Invalid(_))
        ));

        let mut doc = document(HandleUnknown::Error);
        doc.encoders[1].categories.push("Baik".to_string());
        assert!(matches!(
            LinearModelArtifact::from_document(doc),
            Err(ModelLoadError::Invalid(_))
        ));

        let mut doc = document(HandleUnknown::Error);
        doc.feature_names.push("tahun".to_string());
        assert!(matches!(
            LinearModelArtifact::from_document(doc),
            Err(ModelLoadError::Invalid(_))
        ));
    }

    #[test]
    fn test_load_model_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model_luas_tanaman.json");
        let json = serde_json::to_string_pretty(&document(HandleUnknown::Ignore)).unwrap();
        std::fs::File::create(&path)
            .unwrap()
            .write_all(json.as_bytes())
            .unwrap();

        let model = load_model(&path).unwrap();
        assert_eq!(model.target(), Some("luas_tanaman"));
        assert_eq!(model.predict(&frame("Atlantis", "Baik", 2020)).unwrap(), vec![50.0]);
    }

    #[test]
    fn test_load_model_errors() {
        let dir = tempfile::tempdir().unwrap();

        let pickle = dir.path().join("model_luas_tanaman.pkl");
        assert!(matches!(
            load_model(&pickle),
            Err(ModelLoadError::UnsupportedFormat(ext)) if ext == "pkl"
        ));

        let missing = dir.path().join("missing.json");
        assert!(matches!(load_model(&missing), Err(ModelLoadError::Io { .. })));

        let corrupted = dir.path().join("corrupted.json");
        std::fs::write(&corrupted, b"{\"format_version\": 1, \"estim").unwrap();
        assert!(matches!(load_model(&corrupted), Err(ModelLoadError::Decode { .. })));
    }
}
