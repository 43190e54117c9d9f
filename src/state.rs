use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::DashboardConfig;
use crate::data::aggregate::AggregateViews;
use crate::data::domain::{Selection, SelectionDomain};
use crate::data::loader::load_dataset;
use crate::data::model::Dataset;
use crate::error::{DashboardError, EmptyDatasetError, SchemaMismatchError};
use crate::inference::artifact::{load_model, Regressor};
use crate::inference::features::FeatureBuilder;
use crate::inference::predictor::Predictor;

// ---------------------------------------------------------------------------
// Process-wide context: loaded once, read-only afterwards
// ---------------------------------------------------------------------------

/// Everything derived from the two input files.
///
/// Built once at startup and handed to the UI by reference. Nothing in here
/// is mutated after construction.
pub struct DashboardContext {
    pub dataset: Arc<Dataset>,
    pub predictor: Predictor,
    /// `Err` when the dataset has no rows.
    pub domain: Result<SelectionDomain, EmptyDatasetError>,
    /// `Err` when the model's input columns do not match the feature schema.
    pub builder: Result<FeatureBuilder, SchemaMismatchError>,
    pub views: AggregateViews,
}

impl DashboardContext {
    /// Load the dataset and model named by `config`.
    ///
    /// Any loader failure aborts startup.
    pub fn initialize(config: &DashboardConfig) -> Result<Self> {
        let dataset = load_dataset(&config.dataset_path)
            .with_context(|| format!("loading dataset {}", config.dataset_path.display()))?;
        let model = load_model(&config.model_path)
            .with_context(|| format!("loading model {}", config.model_path.display()))?;

        Ok(Self::from_parts(Arc::new(dataset), Arc::new(model)))
    }

    /// Derive domains, views and the feature builder from already-loaded parts.
    pub fn from_parts(dataset: Arc<Dataset>, model: Arc<dyn Regressor>) -> Self {
        let domain = SelectionDomain::extract(&dataset);
        if let Err(e) = &domain {
            log::warn!("{e}");
        }

        let builder = FeatureBuilder::new(model.feature_names());
        if let Err(e) = &builder {
            log::error!("{e}");
        }

        let views = AggregateViews::compute(&dataset);

        Self {
            dataset,
            predictor: Predictor::new(model),
            domain,
            builder,
            views,
        }
    }

    /// Build the feature frame for `selection` and run the model on it.
    pub fn predict(&self, selection: &Selection) -> Result<f64, DashboardError> {
        let builder = self.builder.as_ref().map_err(Clone::clone)?;
        let frame = builder.build_from(selection);
        Ok(self.predictor.predict(&frame)?)
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub context: DashboardContext,

    /// Current inputs (None when the dataset is empty).
    pub selection: Option<Selection>,

    /// Outcome of the last Predict click; cleared when an input changes.
    pub prediction: Option<Result<f64, DashboardError>>,
}

impl AppState {
    pub fn new(context: DashboardContext) -> Self {
        let selection = context
            .domain
            .as_ref()
            .ok()
            .map(SelectionDomain::default_selection);
        Self {
            context,
            selection,
            prediction: None,
        }
    }

    pub fn select_region(&mut self, region: &str) {
        if let Some(sel) = &mut self.selection {
            if sel.region != region {
                sel.region = region.to_string();
                self.prediction = None;
            }
        }
    }

    pub fn select_condition(&mut self, condition: &str) {
        if let Some(sel) = &mut self.selection {
            if sel.condition != condition {
                sel.condition = condition.to_string();
                self.prediction = None;
            }
        }
    }

    pub fn select_year(&mut self, year: i32) {
        if let Some(sel) = &mut self.selection {
            if sel.year != year {
                sel.year = year;
                self.prediction = None;
            }
        }
    }

    /// Run the pipeline for the current selection and keep the outcome.
    pub fn run_prediction(&mut self) {
        let outcome = match &self.selection {
            Some(sel) => self.context.predict(sel),
            None => Err(EmptyDatasetError.into()),
        };
        if let Err(e) = &outcome {
            log::error!("Prediction failed: {e}");
        }
        self.prediction = Some(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Observation;
    use crate::error::PredictionError;
    use crate::inference::artifact::{
        ArtifactDocument, EncoderSpec, HandleUnknown, LinearModelArtifact, ARTIFACT_FORMAT_VERSION,
        LINEAR_REGRESSION,
    };

    fn dataset() -> Arc<Dataset> {
        Arc::new(Dataset::from_observations(vec![
            Observation::new("Bandung", "Baik", 2020, 100.0),
            Observation::new("Bogor", "Rusak", 2021, 20.0),
        ]))
    }

    fn model(feature_names: [&str; 3]) -> Arc<dyn Regressor> {
        let doc = ArtifactDocument {
            format_version: ARTIFACT_FORMAT_VERSION,
            estimator: LINEAR_REGRESSION.to_string(),
            target: None,
            feature_names: feature_names.iter().map(|s| s.to_string()).collect(),
            encoders: vec![
                EncoderSpec {
                    column: "nama_kabupaten_kota".to_string(),
                    categories: vec!["Bandung".to_string(), "Bogor".to_string()],
                    handle_unknown: HandleUnknown::Error,
                },
                EncoderSpec {
                    column: "kondisi_tanaman".to_string(),
                    categories: vec!["Baik".to_string(), "Rusak".to_string()],
                    handle_unknown: HandleUnknown::Error,
                },
            ],
            coefficients: vec![80.0, 10.0, 20.0, 0.0, 0.0],
            intercept: 0.0,
        };
        Arc::new(LinearModelArtifact::from_document(doc).unwrap())
    }

    const SCHEMA: [&str; 3] = ["nama_kabupaten_kota", "kondisi_tanaman", "tahun"];

    #[test]
    fn test_default_selection_and_prediction() {
        let mut state = AppState::new(DashboardContext::from_parts(dataset(), model(SCHEMA)));
        let sel = state.selection.clone().unwrap();
        assert_eq!(sel.region, "Bandung");
        assert_eq!(sel.year, 2021);

        state.run_prediction();
        assert_eq!(state.prediction, Some(Ok(100.0)));
    }

    #[test]
    fn test_changing_input_clears_result() {
        let mut state = AppState::new(DashboardContext::from_parts(dataset(), model(SCHEMA)));
        state.run_prediction();
        state.select_year(2021);
        assert!(state.prediction.is_some(), "same value keeps the result");

        state.select_region("Bogor");
        assert!(state.prediction.is_none());
        state.select_condition("Rusak");
        state.run_prediction();
        assert_eq!(state.prediction, Some(Ok(10.0)));
    }

    #[test]
    fn test_schema_mismatch_only_fails_the_interaction() {
        let ctx = DashboardContext::from_parts(
            dataset(),
            model(["kondisi_tanaman", "nama_kabupaten_kota", "tahun"]),
        );
        assert!(ctx.builder.is_err());
        assert_eq!(ctx.views.ranking.len(), 2);

        let mut state = AppState::new(ctx);
        state.run_prediction();
        assert!(matches!(
            state.prediction,
            Some(Err(DashboardError::SchemaMismatch(_)))
        ));
    }

    #[test]
    fn test_unknown_region_surfaces_prediction_error() {
        let ctx = DashboardContext::from_parts(dataset(), model(SCHEMA));
        let sel = Selection {
            region: "Atlantis".to_string(),
            condition: "Baik".to_string(),
            year: 2020,
        };
        assert!(matches!(
            ctx.predict(&sel),
            Err(DashboardError::Prediction(PredictionError::UnknownCategory { .. }))
        ));
    }

    #[test]
    fn test_empty_dataset_has_no_selection() {
        let ctx = DashboardContext::from_parts(Arc::new(Dataset::default()), model(SCHEMA));
        assert_eq!(ctx.domain, Err(EmptyDatasetError));
        assert_eq!(ctx.views, AggregateViews::default());

        let mut state = AppState::new(ctx);
        assert!(state.selection.is_none());
        state.run_prediction();
        assert!(matches!(
            state.prediction,
            Some(Err(DashboardError::EmptyDataset(_)))
        ));
    }

    #[test]
    fn test_initialize_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig {
            dataset_path: dir.path().join("luastanaman.csv"),
            model_path: dir.path().join("model_luas_tanaman.json"),
        };
        let err = DashboardContext::initialize(&config).err().unwrap();
        assert!(format!("{err:#}").contains("loading dataset"));
    }
}
