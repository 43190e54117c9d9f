//! Cultivated land area dashboard: loads a historical West Java dataset and a
//! fitted linear regression artifact, derives the selectable inputs, predicts
//! the cultivated area for one selection and summarises the data for charts.

pub mod config;
pub mod data;
pub mod error;
pub mod inference;
pub mod state;
