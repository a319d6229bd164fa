use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::snapshots::{Snapshot, SNAPSHOT_NAMES};

/// Startup configuration. Loaded from a JSON file when one exists, otherwise
/// defaults; `BIND_ADDR` in the environment wins over both.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AppConfig {
    /// Name of the active coefficient snapshot.
    pub snapshot: String,
    pub bind_addr: String,
    /// Where recorded outcomes get appended.
    pub feedback_log: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            snapshot: "clean_506".to_string(),
            bind_addr: "0.0.0.0:8080".to_string(),
            feedback_log: PathBuf::from("feedback.jsonl"),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("invalid config JSON at {}", path.display()))
    }

    /// Resolve config from `CONFIG_PATH` (default `predictor.json`). A missing
    /// file is not an error; a present-but-broken one is.
    pub fn from_env() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "predictor.json".to_string());
        let path = Path::new(&path);
        let mut cfg = if path.exists() {
            Self::load(path)?
        } else {
            Self::default()
        };
        if let Ok(addr) = std::env::var("BIND_ADDR") {
            cfg.bind_addr = addr;
        }
        Ok(cfg)
    }

    /// Look up the configured snapshot, failing fast with the known names.
    pub fn resolve_snapshot(&self) -> Result<Snapshot> {
        match Snapshot::by_name(&self.snapshot) {
            Some(s) => Ok(s),
            None => bail!(
                "unknown snapshot '{}' (known: {})",
                self.snapshot,
                SNAPSHOT_NAMES.join(", ")
            ),
        }
    }
}
