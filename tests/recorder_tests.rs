/// Integration tests for configuration loading and the outcome log
///
/// Run with: cargo test --test recorder_tests -- --nocapture
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use skill_predictor::config::AppConfig;
use skill_predictor::feedback::{FeedbackSink, JsonlFeedbackLog, OutcomeRecord};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("skill_predictor_{}_{}", std::process::id(), name))
}

fn sample_record(actual_points: i64) -> OutcomeRecord {
    let mut flags = BTreeMap::new();
    for id in [
        "HC_Moti.1", "HC_Moti.2", "OC_Moti.1", "DC_Moti.1", "HC_TD1", "HC_TD2", "HC_TD3",
        "OC_TD1", "OC_TD2", "OC_TD3", "DC_TD1", "DC_TD2", "DC_TD3",
    ] {
        flags.insert(id.to_string(), 0);
    }
    flags.insert("HC_TD2".to_string(), 1);
    flags.insert("DC_Moti.1".to_string(), 1);

    OutcomeRecord {
        team: "Georgia".to_string(),
        player: "John Smith".to_string(),
        actual_points,
        position: "QB".to_string(),
        year: "FR".to_string(),
        dev_trait: "Normal".to_string(),
        dev_trait_num: 1,
        snaps: 412,
        flags,
        xp_penalty: 15.0,
    }
}

#[test]
fn test_config_defaults() {
    println!("\n=== Test: Config Defaults ===");
    let cfg = AppConfig::default();
    assert_eq!(cfg.snapshot, "clean_506");
    assert_eq!(cfg.bind_addr, "0.0.0.0:8080");
    assert_eq!(cfg.feedback_log, PathBuf::from("feedback.jsonl"));
    assert!(cfg.resolve_snapshot().is_ok(), "default snapshot must resolve");
    println!("✓ Defaults resolve to a loadable snapshot");
}

#[test]
fn test_config_load_from_file() {
    println!("\n=== Test: Config From File ===");
    let path = temp_path("config.json");
    fs::write(
        &path,
        r#"{ "snapshot": "no_auburn_610", "bind_addr": "127.0.0.1:9099" }"#,
    )
    .unwrap();

    let cfg = AppConfig::load(&path).expect("config should load");
    assert_eq!(cfg.snapshot, "no_auburn_610");
    assert_eq!(cfg.bind_addr, "127.0.0.1:9099");
    // Unset fields fall back to defaults.
    assert_eq!(cfg.feedback_log, PathBuf::from("feedback.jsonl"));

    let snap = cfg.resolve_snapshot().expect("named snapshot should resolve");
    assert_eq!(snap.stats.n, 610);

    fs::remove_file(&path).ok();
    println!("✓ File values win, missing keys default");
}

#[test]
fn test_config_rejects_unknown_snapshot() {
    println!("\n=== Test: Unknown Snapshot Name ===");
    let cfg = AppConfig {
        snapshot: "retrain_2031".to_string(),
        ..AppConfig::default()
    };
    let err = cfg.resolve_snapshot().unwrap_err().to_string();
    assert!(err.contains("retrain_2031"), "error should name the bad snapshot: {err}");
    assert!(err.contains("clean_506"), "error should list known names: {err}");
    println!("✓ Startup fails fast with the known-name list");
}

#[test]
fn test_config_rejects_broken_json() {
    println!("\n=== Test: Broken Config JSON ===");
    let path = temp_path("broken.json");
    fs::write(&path, "{ not json").unwrap();
    let err = AppConfig::load(&path).unwrap_err();
    assert!(format!("{err:#}").contains("invalid config JSON"));
    fs::remove_file(&path).ok();
    println!("✓ Present-but-broken config is an error, not a default");
}

#[test]
fn test_outcome_log_appends_flat_rows() {
    println!("\n=== Test: Outcome Log Rows ===");
    let path = temp_path("outcomes.jsonl");
    fs::remove_file(&path).ok();

    let log = JsonlFeedbackLog::open(&path).expect("log should open");
    log.record(&sample_record(31)).expect("first row");
    log.record(&sample_record(38)).expect("second row");

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2, "one line per recorded outcome");

    let row: serde_json::Value = serde_json::from_str(lines[0]).expect("line should be JSON");
    assert_eq!(row["team"], "Georgia");
    assert_eq!(row["actual_points"], 31);
    assert_eq!(row["dev_trait_num"], 1);
    assert_eq!(row["snaps"], 412);
    assert_eq!(row["xp_penalty"], 15.0);
    // Flags are flattened to top-level 0/1 fields, like the sheet columns.
    assert_eq!(row["HC_TD2"], 1);
    assert_eq!(row["DC_Moti.1"], 1);
    assert_eq!(row["OC_TD3"], 0);

    let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(second["actual_points"], 38);

    fs::remove_file(&path).ok();
    println!("✓ Rows append flat, one JSON object per line");
}

#[test]
fn test_outcome_log_reopen_appends() {
    println!("\n=== Test: Outcome Log Reopen ===");
    let path = temp_path("reopen.jsonl");
    fs::remove_file(&path).ok();

    {
        let log = JsonlFeedbackLog::open(&path).unwrap();
        log.record(&sample_record(20)).unwrap();
    }
    {
        let log = JsonlFeedbackLog::open(&path).unwrap();
        log.record(&sample_record(21)).unwrap();
    }

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 2, "reopening must append, not truncate");

    fs::remove_file(&path).ok();
    println!("✓ Reopen preserves earlier rows");
}

#[test]
fn test_outcome_log_open_failure_is_recoverable() {
    println!("\n=== Test: Outcome Log Open Failure ===");
    let path = temp_path("missing_dir").join("nested").join("outcomes.jsonl");
    let err = JsonlFeedbackLog::open(&path).unwrap_err();
    assert!(
        format!("{err:#}").contains("failed to open feedback log"),
        "error should say what it was doing: {err:#}"
    );
    println!("✓ Open failure surfaces as a contextual error, not a panic");
}

#[test]
fn test_outcome_record_serialization_shape() {
    println!("\n=== Test: Outcome Record Shape ===");
    let rec = sample_record(45);
    let value = serde_json::to_value(&rec).unwrap();
    let obj = value.as_object().unwrap();

    // 8 fixed fields + 13 flag columns + the penalty.
    assert_eq!(obj.len(), 8 + 13 + 1, "unexpected field count: {obj:?}");
    assert!(obj.contains_key("player"));
    assert!(obj.contains_key("position"));
    assert!(obj.contains_key("HC_Moti.1"));
    assert!(!obj.contains_key("flags"), "flag map must flatten away");
    println!("✓ Flattened record carries every column exactly once");
}
