//! Skill-points prediction engine and its serving glue.
//!
//! The core is `model`: coefficient tables plus two pure functions, `score`
//! and `accuracy_bands`. Everything else wraps it — embedded snapshots,
//! startup config, the outcome log, and the report formatting the HTTP shell
//! returns.

pub mod config;
pub mod feedback;
pub mod model;
pub mod report;
pub mod snapshots;
pub mod types;

pub use model::{
    accuracy_bands, score, AccuracyBand, AccuracyProfile, Band, CoefficientSet, PredictError,
    PredictionInput, PredictionResult,
};
pub use snapshots::{ModelStats, Snapshot, SNAPSHOT_NAMES};
