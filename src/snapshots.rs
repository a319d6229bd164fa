//! Embedded coefficient snapshots.
//!
//! Two historical fits of the skill-points model survive, and they disagree
//! (different category sets, different floor behavior). Each one lives here
//! as a complete named `Snapshot`; the active one is picked by name at
//! startup, never by editing tables in place.

use crate::model::{AccuracyBand, AccuracyProfile, CoefficientSet};
use serde::Serialize;
use std::collections::HashMap;

/// Fit-quality statistics reported alongside predictions.
#[derive(Debug, Clone, Serialize)]
pub struct ModelStats {
    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub mae: f64,
    pub rmse: f64,
    pub n: u32,
    /// Whole-population coverage, all segments pooled.
    pub overall_ranges: Vec<AccuracyBand>,
}

/// One complete model version: coefficients, per-segment calibration, fit
/// stats, and the numeric code each development trait gets in recorded rows.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub coeffs: CoefficientSet,
    pub profiles: HashMap<String, AccuracyProfile>,
    pub stats: ModelStats,
    pub dev_trait_codes: HashMap<String, u8>,
}

pub const SNAPSHOT_NAMES: [&str; 2] = ["clean_506", "no_auburn_610"];

impl Snapshot {
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "clean_506" => Some(clean_506()),
            "no_auburn_610" => Some(no_auburn_610()),
            _ => None,
        }
    }
}

// ---------- Table builders ----------

fn table(entries: &[(&str, f64)]) -> (Vec<String>, HashMap<String, f64>) {
    let order = entries.iter().map(|(k, _)| k.to_string()).collect();
    let map = entries.iter().map(|(k, v)| (k.to_string(), *v)).collect();
    (order, map)
}

fn bands(pairs: &[(f64, f64)]) -> Vec<AccuracyBand> {
    pairs
        .iter()
        .map(|&(radius, coverage_pct)| AccuracyBand {
            radius,
            coverage_pct,
        })
        .collect()
}

fn profile(sample_size: u32, mean_abs_error: f64, pairs: &[(f64, f64)]) -> AccuracyProfile {
    AccuracyProfile {
        sample_size,
        mean_abs_error,
        bands: bands(pairs),
    }
}

/// Shared across snapshots: the coaching-ability flag ids and their labels.
fn ability_labels() -> (Vec<String>, HashMap<String, String>) {
    let pairs = [
        ("HC_Moti.1", "HC Motivator Tier 1"),
        ("HC_Moti.2", "HC Motivator Tier 2"),
        ("OC_Moti.1", "OC Motivator Tier 1"),
        ("DC_Moti.1", "DC Motivator Tier 1"),
        ("HC_TD1", "HC Talent Developer Tier 1"),
        ("HC_TD2", "HC Talent Developer Tier 2"),
        ("HC_TD3", "HC Talent Developer Tier 3"),
        ("OC_TD1", "OC Talent Developer Tier 1"),
        ("OC_TD2", "OC Talent Developer Tier 2"),
        ("OC_TD3", "OC Talent Developer Tier 3"),
        ("DC_TD1", "DC Talent Developer Tier 1"),
        ("DC_TD2", "DC Talent Developer Tier 2"),
        ("DC_TD3", "DC Talent Developer Tier 3"),
    ];
    let order = pairs.iter().map(|(k, _)| k.to_string()).collect();
    let labels = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    (order, labels)
}

fn dev_trait_codes() -> HashMap<String, u8> {
    [("Elite", 4), ("Star", 3), ("Impact", 2), ("Normal", 1)]
        .iter()
        .map(|(k, v)| (k.to_string(), *v))
        .collect()
}

// ---------- clean_506 ----------

/// 506-player fit with outliers removed. No output floor: this version
/// reports whatever the linear combination says, negatives included.
pub fn clean_506() -> Snapshot {
    let (position_order, position) = table(&[
        ("QB", 0.0),
        ("RB", -4.687237),
        ("WR", -0.3681322),
        ("TE", -6.699325),
        ("OL", 3.123435),
        ("DL", -6.514467),
        ("DT", -3.839926),
        ("LB", -10.68404),
        ("S", -2.186808),
        ("CB", 0.5434067),
        ("K", 0.2088728),
        ("P", 0.8526459),
    ]);
    let (year_order, year) = table(&[
        ("FR", 0.0),
        ("FR (RS)", -2.86779),
        ("SO", -3.145401),
        ("SO (RS)", -5.05219),
        ("JR", -4.748136),
        ("JR (RS)", -2.66559),
        ("SR", 0.08653364),
    ]);
    let (dev_trait_order, dev_trait) = table(&[
        ("Elite", 0.0),
        ("Star", -23.53652),
        ("Impact", -38.18651),
        ("Normal", -50.53085),
    ]);
    let (trait_order, trait_labels) = ability_labels();
    let (_, trait_bonuses) = table(&[
        ("HC_Moti.1", 0.35494),
        ("HC_Moti.2", 2.03755),
        ("OC_Moti.1", 0.62476),
        ("DC_Moti.1", 3.16875),
        ("HC_TD1", 9.49064),
        ("HC_TD2", 2.77841),
        ("HC_TD3", -0.33346),
        ("OC_TD1", 3.08600),
        ("OC_TD2", 1.82702),
        ("OC_TD3", 2.45405),
        ("DC_TD1", -1.44690),
        ("DC_TD2", 14.21596),
        ("DC_TD3", 13.07231),
    ]);

    let mut profiles = HashMap::new();
    profiles.insert(
        "Elite".to_string(),
        profile(11, 8.62, &[(5.0, 27.3), (10.0, 63.6), (15.0, 90.9)]),
    );
    profiles.insert(
        "Impact".to_string(),
        profile(250, 4.05, &[(5.0, 68.8), (10.0, 94.8), (15.0, 99.2)]),
    );
    profiles.insert(
        "Normal".to_string(),
        profile(116, 5.5, &[(5.0, 51.7), (10.0, 82.8), (15.0, 99.1)]),
    );
    profiles.insert(
        "Star".to_string(),
        profile(129, 5.39, &[(5.0, 48.1), (10.0, 86.8), (15.0, 97.7)]),
    );

    Snapshot {
        coeffs: CoefficientSet {
            name: "clean_506".to_string(),
            intercept: 83.40709,
            position,
            year,
            dev_trait,
            position_order,
            year_order,
            dev_trait_order,
            trait_bonuses,
            trait_order,
            trait_labels,
            penalty_coeff: -0.42761,
            penalty_max: 100.0,
            floor_at_zero: false,
        },
        profiles,
        stats: ModelStats {
            r_squared: 0.9322,
            adj_r_squared: 0.9273,
            mae: 4.38,
            rmse: 5.65,
            n: 506,
            overall_ranges: bands(&[
                (5.0, 58.7),
                (7.5, 76.48),
                (10.0, 89.33),
                (20.0, 100.0),
                (25.0, 100.0),
            ]),
        },
        dev_trait_codes: dev_trait_codes(),
    }
}

// ---------- no_auburn_610 ----------

/// 610-player refit (Auburn dropped from the training data). This version
/// clamps predictions at zero.
pub fn no_auburn_610() -> Snapshot {
    let (position_order, position) = table(&[
        ("QB", 0.0),
        ("RB", -6.2637),
        ("WR", -2.4537),
        ("TE", -7.1273),
        ("OL", -0.1576),
        ("DL", -8.0265),
        ("LB", -11.7211),
        ("CB", -1.7674),
        ("S", -4.449),
        ("K", -1.98),
        ("P", -2.2867),
    ]);
    let (year_order, year) = table(&[
        ("FR", 0.0),
        ("FR (RS)", -3.7344),
        ("SO", -1.8989),
        ("SO (RS)", -6.2791),
        ("JR", -3.9333),
        ("JR (RS)", -3.0805),
    ]);
    let (dev_trait_order, dev_trait) = table(&[
        ("Elite", 0.0),
        ("Star", -23.4378),
        ("Impact", -36.3314),
        ("Normal", -47.7393),
    ]);
    let (trait_order, trait_labels) = ability_labels();
    let (_, trait_bonuses) = table(&[
        ("HC_Moti.1", 0.8413),
        ("HC_Moti.2", 1.3696),
        ("OC_Moti.1", 0.1399),
        ("DC_Moti.1", 2.0169),
        ("HC_TD1", 6.3471),
        ("HC_TD2", 1.5988),
        ("HC_TD3", -2.6348),
        ("OC_TD1", 0.9023),
        ("OC_TD2", 0.9902),
        ("OC_TD3", 4.0082),
        ("DC_TD1", 3.5946),
        ("DC_TD2", 1.8137),
        ("DC_TD3", -1.0978),
    ]);

    let mut profiles = HashMap::new();
    profiles.insert(
        "Elite".to_string(),
        profile(8, 8.26, &[(5.0, 37.5), (10.0, 50.0), (15.0, 75.0)]),
    );
    profiles.insert(
        "Star".to_string(),
        profile(145, 5.60, &[(5.0, 51.0), (10.0, 86.9), (15.0, 96.6)]),
    );
    profiles.insert(
        "Impact".to_string(),
        profile(300, 3.18, &[(5.0, 72.3), (10.0, 98.3), (15.0, 99.7)]),
    );
    profiles.insert(
        "Normal".to_string(),
        profile(157, 4.43, &[(5.0, 62.4), (10.0, 93.6), (15.0, 98.7)]),
    );

    Snapshot {
        coeffs: CoefficientSet {
            name: "no_auburn_610".to_string(),
            intercept: 84.3846,
            position,
            year,
            dev_trait,
            position_order,
            year_order,
            dev_trait_order,
            trait_bonuses,
            trait_order,
            trait_labels,
            penalty_coeff: -0.4372,
            penalty_max: 100.0,
            floor_at_zero: true,
        },
        profiles,
        stats: ModelStats {
            r_squared: 0.92155,
            adj_r_squared: 0.92155,
            mae: 3.991,
            rmse: 5.209,
            n: 610,
            overall_ranges: bands(&[(5.0, 71.0), (10.0, 94.0), (15.0, 99.0)]),
        },
        dev_trait_codes: dev_trait_codes(),
    }
}
