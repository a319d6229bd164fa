use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json,
};
use parking_lot::Mutex;
use serde_json::json;
use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use anyhow::Context;
use skill_predictor::config::AppConfig;
use skill_predictor::feedback::{FeedbackSink, JsonlFeedbackLog, OutcomeRecord};
use skill_predictor::model::{accuracy_bands, score, PredictError, PredictionInput};
use skill_predictor::report::{accuracy_text, breakdown};
use skill_predictor::snapshots::Snapshot;
use skill_predictor::types::{
    AbilityInfo, FeedbackRequest, FeedbackResponse, ModelInfo, PredictRequest, PredictResponse,
    SegmentAccuracy,
};

// ---------- Server state ----------

/// One prediction waiting for its observed outcome. Owned by the shell, not
/// the engine: each /predict replaces it, /feedback consumes it.
struct PendingPrediction {
    team: String,
    player: String,
    snaps: u32,
    input: PredictionInput,
    points: f64,
}

#[derive(Clone)]
struct AppState {
    snapshot: Arc<Snapshot>,
    pending: Arc<Mutex<Option<PendingPrediction>>>,
    sink: Arc<dyn FeedbackSink>,
}

type ApiError = (StatusCode, Json<serde_json::Value>);

fn unprocessable(e: PredictError) -> ApiError {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "error": e.to_string() })),
    )
}

// ---------- Handlers ----------

async fn predict(
    State(state): State<AppState>,
    Json(req): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let coeffs = &state.snapshot.coeffs;

    // Every flag key must be a known ability id, on or off.
    let mut flags = BTreeSet::new();
    for (id, value) in &req.flags {
        coeffs.trait_bonus(id).map_err(unprocessable)?;
        if *value != 0 {
            flags.insert(id.clone());
        }
    }

    let input = PredictionInput {
        position: req.position,
        year: req.year,
        dev_trait: req.dev_trait,
        xp_penalty: req.xp_penalty,
        flags,
    };

    let result = score(&input, coeffs).map_err(unprocessable)?;
    let bands = accuracy_bands(&input.dev_trait, result.points, &state.snapshot.profiles)
        .map_err(unprocessable)?;
    let parts = breakdown(&input, coeffs).map_err(unprocessable)?;
    let profile = &state.snapshot.profiles[&input.dev_trait];

    tracing::info!(
        "scored {}/{}/{} penalty={} flags={} -> {:.2} points",
        input.position,
        input.year,
        input.dev_trait,
        input.xp_penalty,
        input.flags.len(),
        result.points
    );

    let response = PredictResponse {
        points: result.points,
        snapshot: coeffs.name.clone(),
        segment: SegmentAccuracy {
            dev_trait: input.dev_trait.clone(),
            sample_size: profile.sample_size,
            mean_abs_error: profile.mean_abs_error,
        },
        accuracy_text: accuracy_text(&input.dev_trait, profile, &bands),
        bands,
        breakdown: parts,
    };

    *state.pending.lock() = Some(PendingPrediction {
        team: req.team,
        player: req.player,
        snaps: req.snaps,
        input,
        points: result.points,
    });

    Ok(Json(response))
}

async fn feedback(
    State(state): State<AppState>,
    Json(req): Json<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    let Some(p) = state.pending.lock().take() else {
        return Err((
            StatusCode::CONFLICT,
            Json(json!({ "error": "no prediction pending; call /predict first" })),
        ));
    };

    let coeffs = &state.snapshot.coeffs;
    let mut flags = BTreeMap::new();
    for id in &coeffs.trait_order {
        flags.insert(id.clone(), u8::from(p.input.flags.contains(id)));
    }
    let dev_trait_num = state
        .snapshot
        .dev_trait_codes
        .get(&p.input.dev_trait)
        .copied()
        .unwrap_or(0);

    let rec = OutcomeRecord {
        team: p.team,
        player: p.player,
        actual_points: req.actual_points,
        position: p.input.position,
        year: p.input.year,
        dev_trait: p.input.dev_trait,
        dev_trait_num,
        snaps: p.snaps,
        flags,
        xp_penalty: p.input.xp_penalty,
    };

    let prediction_error = (req.actual_points as f64 - p.points).abs();
    match state.sink.record(&rec) {
        Ok(()) => Ok(Json(FeedbackResponse {
            saved: true,
            prediction_error,
            notice: None,
        })),
        Err(e) => {
            // The prediction stays valid either way; this is a notice, not a failure.
            tracing::warn!("outcome not saved: {e:#}");
            Ok(Json(FeedbackResponse {
                saved: false,
                prediction_error,
                notice: Some(format!("could not save outcome: {e}")),
            }))
        }
    }
}

async fn model_info(State(state): State<AppState>) -> Json<ModelInfo> {
    let coeffs = &state.snapshot.coeffs;
    let abilities = coeffs
        .trait_order
        .iter()
        .map(|id| AbilityInfo {
            id: id.clone(),
            label: coeffs.trait_labels.get(id).cloned().unwrap_or_default(),
        })
        .collect();

    Json(ModelInfo {
        snapshot: coeffs.name.clone(),
        stats: state.snapshot.stats.clone(),
        positions: coeffs.position_order.clone(),
        years: coeffs.year_order.clone(),
        dev_traits: coeffs.dev_trait_order.clone(),
        abilities,
        penalty_max: coeffs.penalty_max,
        floor_at_zero: coeffs.floor_at_zero,
    })
}

// ---------- Startup ----------

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cfg = AppConfig::from_env()?;
    let snapshot = cfg.resolve_snapshot()?;

    // Self-check: the all-baseline input must score to the intercept.
    let baseline = PredictionInput {
        position: "QB".to_string(),
        year: "FR".to_string(),
        dev_trait: "Elite".to_string(),
        xp_penalty: 0.0,
        flags: BTreeSet::new(),
    };
    let check = score(&baseline, &snapshot.coeffs)?;
    tracing::info!("self-check baseline score: {:.5}", check.points);

    tracing::info!(
        "snapshot '{}' loaded (n={}, r2={:.4}, mae={:.2}, floor={})",
        snapshot.coeffs.name,
        snapshot.stats.n,
        snapshot.stats.r_squared,
        snapshot.stats.mae,
        snapshot.coeffs.floor_at_zero
    );

    let sink: Arc<dyn FeedbackSink> = Arc::new(
        JsonlFeedbackLog::open(&cfg.feedback_log).context("failed to open feedback log")?,
    );

    let state = AppState {
        snapshot: Arc::new(snapshot),
        pending: Arc::new(Mutex::new(None)),
        sink,
    };

    let app = axum::Router::new()
        .route("/predict", post(predict))
        .route("/feedback", post(feedback))
        .route("/model", get(model_info))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.bind_addr))?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
