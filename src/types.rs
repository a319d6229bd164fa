use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::Band;
use crate::report::Breakdown;
use crate::snapshots::ModelStats;

// ---------- Request types ----------

// FLAT request: player info as top-level keys, plus one 0/1 key per
// coaching flag (nonzero = on).
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub player: String,
    #[serde(default)]
    pub snaps: u32,
    pub position: String,
    pub year: String,
    pub dev_trait: String,
    #[serde(default)]
    pub xp_penalty: f64,
    #[serde(flatten)]
    pub flags: BTreeMap<String, u8>,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub actual_points: i64,
}

// ---------- Response types ----------

/// Calibration summary for the predicted player's segment.
#[derive(Debug, Serialize)]
pub struct SegmentAccuracy {
    pub dev_trait: String,
    pub sample_size: u32,
    pub mean_abs_error: f64,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub points: f64,
    pub snapshot: String,
    pub segment: SegmentAccuracy,
    pub bands: Vec<Band>,
    pub breakdown: Breakdown,
    /// Preformatted accuracy lines, for shells that just print.
    pub accuracy_text: String,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub saved: bool,
    pub prediction_error: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AbilityInfo {
    pub id: String,
    pub label: String,
}

/// Everything a form shell needs to render itself for the active snapshot.
#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub snapshot: String,
    pub stats: ModelStats,
    pub positions: Vec<String>,
    pub years: Vec<String>,
    pub dev_traits: Vec<String>,
    pub abilities: Vec<AbilityInfo>,
    pub penalty_max: f64,
    pub floor_at_zero: bool,
}
