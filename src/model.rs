use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

// ---------- Errors ----------

/// Caller-input errors. The engine holds no mutable state, so every variant
/// is recoverable by fixing the input and calling again.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictError {
    #[error("unknown {kind}: '{value}'")]
    UnknownCategory { kind: &'static str, value: String },
    #[error("{field} must be within 0..={max}, got {value}")]
    InvalidRange {
        field: &'static str,
        value: f64,
        max: f64,
    },
    #[error("no accuracy profile for development trait '{0}'")]
    UnknownSegment(String),
}

// ---------- Coefficient tables ----------

/// One fitted-model snapshot's coefficient tables. Loaded once at startup and
/// shared read-only; every lookup map stores its baseline category as an
/// explicit 0.0 entry so lookups are total.
///
/// The maps hold the values; the `*_order` vectors are the authoritative
/// display order (maps don't keep one).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoefficientSet {
    pub name: String,
    pub intercept: f64,
    pub position: HashMap<String, f64>,
    pub year: HashMap<String, f64>,
    pub dev_trait: HashMap<String, f64>,
    pub position_order: Vec<String>,
    pub year_order: Vec<String>,
    pub dev_trait_order: Vec<String>,
    /// Coaching-ability bonuses, applied when the flag is on.
    pub trait_bonuses: HashMap<String, f64>,
    pub trait_order: Vec<String>,
    /// Human-readable label per flag id, for form shells.
    pub trait_labels: HashMap<String, String>,
    /// Multiplied by the experience-penalty input. Negative in every snapshot
    /// fitted so far.
    pub penalty_coeff: f64,
    pub penalty_max: f64,
    /// Some snapshot versions clamp output at zero, some don't. Explicit flag,
    /// set from what each source model actually did.
    pub floor_at_zero: bool,
}

fn lookup(
    map: &HashMap<String, f64>,
    kind: &'static str,
    value: &str,
) -> Result<f64, PredictError> {
    map.get(value)
        .copied()
        .ok_or_else(|| PredictError::UnknownCategory {
            kind,
            value: value.to_string(),
        })
}

impl CoefficientSet {
    pub fn position_offset(&self, value: &str) -> Result<f64, PredictError> {
        lookup(&self.position, "position", value)
    }

    pub fn year_offset(&self, value: &str) -> Result<f64, PredictError> {
        lookup(&self.year, "year", value)
    }

    pub fn dev_trait_offset(&self, value: &str) -> Result<f64, PredictError> {
        lookup(&self.dev_trait, "development trait", value)
    }

    pub fn trait_bonus(&self, flag: &str) -> Result<f64, PredictError> {
        lookup(&self.trait_bonuses, "coaching ability", flag)
    }

    pub fn check_penalty(&self, value: f64) -> Result<(), PredictError> {
        if !value.is_finite() || value < 0.0 || value > self.penalty_max {
            return Err(PredictError::InvalidRange {
                field: "xp_penalty",
                value,
                max: self.penalty_max,
            });
        }
        Ok(())
    }
}

// ---------- Accuracy profiles ----------

/// Calibration band from the fit: within `radius` points of the prediction,
/// `coverage_pct` percent of the time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AccuracyBand {
    pub radius: f64,
    pub coverage_pct: f64,
}

/// Per-development-trait calibration data. Bands are stored in ascending
/// radius order and must stay that way; display relies on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccuracyProfile {
    pub sample_size: u32,
    pub mean_abs_error: f64,
    pub bands: Vec<AccuracyBand>,
}

// ---------- Scoring ----------

/// One scoring request, built by the caller from form state.
#[derive(Debug, Clone)]
pub struct PredictionInput {
    pub position: String,
    pub year: String,
    pub dev_trait: String,
    pub xp_penalty: f64,
    /// Flag ids currently on.
    pub flags: BTreeSet<String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PredictionResult {
    pub points: f64,
}

/// Linear-combination score: intercept + the three categorical offsets +
/// penalty term + the sum of enabled coaching bonuses. Pure and
/// deterministic; no defaults for unknown categories.
pub fn score(
    input: &PredictionInput,
    coeffs: &CoefficientSet,
) -> Result<PredictionResult, PredictError> {
    coeffs.check_penalty(input.xp_penalty)?;

    let mut points = coeffs.intercept;
    points += coeffs.position_offset(&input.position)?;
    points += coeffs.year_offset(&input.year)?;
    points += coeffs.dev_trait_offset(&input.dev_trait)?;
    points += coeffs.penalty_coeff * input.xp_penalty;
    for flag in &input.flags {
        points += coeffs.trait_bonus(flag)?;
    }

    if coeffs.floor_at_zero {
        points = points.max(0.0);
    }

    Ok(PredictionResult { points })
}

// ---------- Confidence bands ----------

/// A concrete interval around one prediction.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Band {
    pub lower: f64,
    pub upper: f64,
    pub coverage_pct: f64,
}

/// Expand the segment's calibration bands around `points`, in profile order.
/// Lower bounds clamp at zero (skill points can't go negative); upper bounds
/// don't.
pub fn accuracy_bands(
    dev_trait: &str,
    points: f64,
    profiles: &HashMap<String, AccuracyProfile>,
) -> Result<Vec<Band>, PredictError> {
    let profile = profiles
        .get(dev_trait)
        .ok_or_else(|| PredictError::UnknownSegment(dev_trait.to_string()))?;

    Ok(profile
        .bands
        .iter()
        .map(|b| Band {
            lower: (points - b.radius).max(0.0),
            upper: points + b.radius,
            coverage_pct: b.coverage_pct,
        })
        .collect())
}
