//! Turns a scored prediction into something a shell can show: the per-term
//! contribution breakdown and the accuracy-range lines.

use crate::model::{AccuracyProfile, Band, CoefficientSet, PredictError, PredictionInput};
use serde::Serialize;
use std::fmt;

/// One categorical term: which label was picked and what it contributed.
#[derive(Debug, Clone, Serialize)]
pub struct Term {
    pub label: String,
    pub effect: f64,
}

/// Per-term decomposition of a single prediction. `total` matches what
/// `score` returns for the same input, floor included.
#[derive(Debug, Clone, Serialize)]
pub struct Breakdown {
    pub base: f64,
    pub position: Term,
    pub year: Term,
    pub dev_trait: Term,
    pub penalty: f64,
    pub coaching: f64,
    pub total: f64,
}

pub fn breakdown(
    input: &PredictionInput,
    coeffs: &CoefficientSet,
) -> Result<Breakdown, PredictError> {
    coeffs.check_penalty(input.xp_penalty)?;

    let position = coeffs.position_offset(&input.position)?;
    let year = coeffs.year_offset(&input.year)?;
    let dev_trait = coeffs.dev_trait_offset(&input.dev_trait)?;
    let penalty = coeffs.penalty_coeff * input.xp_penalty;
    let coaching = input
        .flags
        .iter()
        .map(|f| coeffs.trait_bonus(f))
        .sum::<Result<f64, _>>()?;

    let mut total = coeffs.intercept + position + year + dev_trait + penalty + coaching;
    if coeffs.floor_at_zero {
        total = total.max(0.0);
    }

    Ok(Breakdown {
        base: coeffs.intercept,
        position: Term {
            label: input.position.clone(),
            effect: position,
        },
        year: Term {
            label: input.year.clone(),
            effect: year,
        },
        dev_trait: Term {
            label: input.dev_trait.clone(),
            effect: dev_trait,
        },
        penalty,
        coaching,
        total,
    })
}

impl fmt::Display for Breakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Base: {:.2}", self.base)?;
        writeln!(
            f,
            "Position ({}): {:+.2}",
            self.position.label, self.position.effect
        )?;
        writeln!(f, "Year ({}): {:+.2}", self.year.label, self.year.effect)?;
        writeln!(
            f,
            "Dev Trait ({}): {:+.2}",
            self.dev_trait.label, self.dev_trait.effect
        )?;
        writeln!(f, "XP Penalty: {:+.2}", self.penalty)?;
        writeln!(f, "Coaching Traits: {:+.2}", self.coaching)?;
        write!(f, "Total: {:.2} points", self.total)
    }
}

/// The human-readable accuracy summary for one segment, band lines included.
/// Bands must already be expanded around the prediction (see
/// `accuracy_bands`); they are rendered in the order given.
pub fn accuracy_text(dev_trait: &str, profile: &AccuracyProfile, bands: &[Band]) -> String {
    let mut out = format!(
        "Accuracy for {} players (based on {} players):\nTypical error: ±{:.1} points\n",
        dev_trait, profile.sample_size, profile.mean_abs_error
    );
    for (spec, band) in profile.bands.iter().zip(bands) {
        out.push_str(&format!(
            "±{:.0} points ({:.1}% of the time): {:.1} - {:.1}\n",
            spec.radius, band.coverage_pct, band.lower, band.upper
        ));
    }
    out
}
