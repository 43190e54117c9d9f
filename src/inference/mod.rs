//! Inference layer: model artifact, feature construction and prediction.
//!
//! ```text
//!   model_luas_tanaman.json
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ artifact  │  JSON → LinearModelArtifact (impl Regressor)
//!   └──────────┘
//!        │ feature_names
//!        ▼
//!   ┌──────────┐   region, condition, year
//!   │ features  │ ◄──────────────────────── Selection
//!   └──────────┘
//!        │ one-row FeatureFrame
//!        ▼
//!   ┌──────────┐
//!   │ predictor │  → f64 hectares
//!   └──────────┘
//! ```

pub mod artifact;
pub mod features;
pub mod predictor;
