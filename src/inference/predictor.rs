use std::sync::Arc;

use super::artifact::Regressor;
use super::features::FeatureFrame;
use crate::error::PredictionError;

/// Unit label shown next to every estimate.
pub const AREA_UNIT: &str = "hectares";

/// Runs the shared model on single-row feature frames.
#[derive(Clone)]
pub struct Predictor {
    model: Arc<dyn Regressor>,
}

impl Predictor {
    pub fn new(model: Arc<dyn Regressor>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &dyn Regressor {
        self.model.as_ref()
    }

    /// The model's estimate for the first (only) row of `frame`.
    pub fn predict(&self, frame: &FeatureFrame) -> Result<f64, PredictionError> {
        let outputs = self.model.predict(frame)?;
        let value = outputs
            .first()
            .copied()
            .ok_or(PredictionError::EmptyOutput)?;
        log::debug!("Predicted {value:.4} for {:?}", frame.rows().first());
        Ok(value)
    }
}

/// Render an estimate the way the dashboard displays it.
pub fn format_prediction(value: f64) -> String {
    format!("{value:.2} {AREA_UNIT}")
}
