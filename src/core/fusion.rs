//! Aurora-chance fusion: the OVATION probability at the query point scaled by
//! independent Kp, Bz and solar-wind-speed modulators.
//!
//! The combination is multiplicative so a zero base stays zero no matter how
//! active the magnetosphere is. Each modulator is neutral (1.0) when its input is
//! unknown, which lets a partial outage degrade precision instead of the score.

use crate::core::grid::probability_at;
use crate::domain::model::{AuroraResult, GeoPoint, GridSample, SolarWindSnapshot};

pub const OVATION_UNAVAILABLE: &str = "OVATION data unavailable right now.";
pub const VERDICT_SOUTHWARD: &str = "Southward Bz: favorable.";
pub const VERDICT_NORTHWARD: &str = "Northward Bz: unfavorable.";
pub const VERDICT_MIXED: &str = "Mixed solar wind conditions.";

const SOUTHWARD_BZ_NT: f64 = -5.0;
const NORTHWARD_BZ_NT: f64 = 2.0;

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// ~0.85 at quiet Kp up to ~1.20 in a storm, centred on Kp 4.5.
pub fn kp_factor(kp: Option<f64>) -> f64 {
    match finite(kp) {
        Some(kp) => 0.85 + 0.35 * sigmoid((kp - 4.5) * 1.2),
        None => 1.0,
    }
}

/// ~0.85 for strongly northward Bz up to ~1.25 for strongly southward Bz.
pub fn bz_factor(bz: Option<f64>) -> f64 {
    match finite(bz) {
        Some(bz) => 0.85 + 0.40 * sigmoid((-bz - 2.0) / 3.0),
        None => 1.0,
    }
}

/// ~0.90 for slow wind up to ~1.15 for fast streams, centred on 420 km/s.
pub fn speed_factor(speed: Option<f64>) -> f64 {
    match finite(speed) {
        Some(speed) => 0.90 + 0.25 * sigmoid((speed - 420.0) / 80.0),
        None => 1.0,
    }
}

pub fn verdict(bz: Option<f64>) -> &'static str {
    match finite(bz) {
        Some(bz) if bz < SOUTHWARD_BZ_NT => VERDICT_SOUTHWARD,
        Some(bz) if bz > NORTHWARD_BZ_NT => VERDICT_NORTHWARD,
        _ => VERDICT_MIXED,
    }
}

fn build_note(kp: Option<f64>, bz: Option<f64>, speed: Option<f64>) -> String {
    let mut bits = Vec::new();
    if let Some(kp) = kp {
        bits.push(format!("Kp {:.1}", kp));
    }
    if let Some(bz) = bz {
        bits.push(format!("Bz {:.1} nT", bz));
    }
    if let Some(speed) = speed {
        bits.push(format!("Speed {:.0} km/s", speed));
    }

    let verdict = verdict(bz);
    if bits.is_empty() {
        verdict.to_string()
    } else {
        format!("{} ({})", verdict, bits.join(", "))
    }
}

/// Fuse a base OVATION probability with the geomagnetic modulators.
///
/// With no base probability the result is a hard zero and every derived field
/// is `None`: without the oval there is nothing to modulate.
pub fn compute_aurora_chance(
    base: Option<f64>,
    kp: Option<f64>,
    wind: &SolarWindSnapshot,
) -> AuroraResult {
    let Some(base) = finite(base) else {
        return AuroraResult {
            chance: 0.0,
            ovation_probability: None,
            kp: None,
            bz_gsm: None,
            speed: None,
            density: None,
            note: OVATION_UNAVAILABLE.to_string(),
        };
    };

    let base = base.clamp(0.0, 100.0);
    let kp = finite(kp);
    let bz = finite(wind.bz_gsm);
    let speed = finite(wind.speed);

    let chance = (base * kp_factor(kp) * bz_factor(bz) * speed_factor(speed)).clamp(0.0, 100.0);

    AuroraResult {
        chance,
        ovation_probability: Some(base),
        kp,
        bz_gsm: bz,
        speed,
        density: finite(wind.density),
        note: build_note(kp, bz, speed),
    }
}

/// Grid lookup and fusion in one call.
pub fn score_location(
    samples: &[GridSample],
    point: &GeoPoint,
    kp: Option<f64>,
    wind: &SolarWindSnapshot,
) -> AuroraResult {
    compute_aurora_chance(probability_at(samples, point), kp, wind)
}
