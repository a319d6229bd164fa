//! Records observed outcomes next to the inputs that produced a prediction,
//! for later model refits. Persistence failures are reported upward and must
//! stay non-fatal: the prediction the user already has remains valid.

use anyhow::{Context, Result};
use parking_lot::Mutex;
use serde::Serialize;
use std::{
    collections::BTreeMap,
    fs::{File, OpenOptions},
    io::Write,
    path::Path,
};

/// One flattened observed-vs-predicted row. Each coaching flag becomes its
/// own 0/1 field via the flattened map.
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeRecord {
    pub team: String,
    pub player: String,
    pub actual_points: i64,
    pub position: String,
    pub year: String,
    pub dev_trait: String,
    pub dev_trait_num: u8,
    pub snaps: u32,
    #[serde(flatten)]
    pub flags: BTreeMap<String, u8>,
    pub xp_penalty: f64,
}

pub trait FeedbackSink: Send + Sync {
    fn record(&self, rec: &OutcomeRecord) -> Result<()>;
}

/// Append-only local log, one JSON object per line.
#[derive(Debug)]
pub struct JsonlFeedbackLog {
    file: Mutex<File>,
}

impl JsonlFeedbackLog {
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open feedback log at {}", path.display()))?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl FeedbackSink for JsonlFeedbackLog {
    fn record(&self, rec: &OutcomeRecord) -> Result<()> {
        let line = serde_json::to_string(rec).context("failed to serialize outcome record")?;
        let mut file = self.file.lock();
        writeln!(file, "{line}").context("failed to append outcome record")?;
        file.flush().context("failed to flush feedback log")?;
        Ok(())
    }
}
