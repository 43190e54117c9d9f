//! Data layer: core types, loading, selection domains and summaries.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → Dataset
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ Dataset   │  Vec<Observation>, read-only
//!   └──────────┘
//!        │
//!        ├──────────────────────┐
//!        ▼                      ▼
//!   ┌──────────┐         ┌────────────┐
//!   │  domain   │         │ aggregate  │  distribution / trend / ranking
//!   └──────────┘         └────────────┘
//!   selectable regions, conditions, years
//! ```

pub mod aggregate;
pub mod domain;
pub mod loader;
pub mod model;
