//! Nearest-point lookup on the OVATION probability grid.
//!
//! Distance is squared Euclidean in (latitude, wrapped longitude) degrees, not
//! great-circle distance. Longitude degrees shrink towards the poles and this
//! metric does not compensate; on a 1° forecast grid the nearest cell is still
//! the right one almost everywhere. Lookup is a full scan.

use crate::domain::model::{GeoPoint, GridSample};

/// Map any longitude into [-180, 180).
pub fn wrap_longitude(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Longitude difference after wrapping, so 179° and -179° are 2° apart.
fn longitude_delta(a: f64, b: f64) -> f64 {
    wrap_longitude(wrap_longitude(a) - wrap_longitude(b))
}

pub fn squared_distance(sample: &GridSample, lat: f64, lon: f64) -> f64 {
    let dlat = sample.lat - lat;
    let dlon = longitude_delta(sample.lon, lon);
    dlat * dlat + dlon * dlon
}

/// The first sample at minimum distance, in input order. Samples with
/// non-finite members never match.
pub fn nearest_sample(samples: &[GridSample], lat: f64, lon: f64) -> Option<&GridSample> {
    let mut best: Option<(&GridSample, f64)> = None;
    for sample in samples.iter().filter(|s| s.is_finite()) {
        let d2 = squared_distance(sample, lat, lon);
        match best {
            Some((_, best_d2)) if d2 >= best_d2 => {}
            _ => best = Some((sample, d2)),
        }
    }
    best.map(|(sample, _)| sample)
}

pub fn nearest_probability(samples: &[GridSample], lat: f64, lon: f64) -> Option<f64> {
    nearest_sample(samples, lat, lon).map(|s| s.probability)
}

pub fn probability_at(samples: &[GridSample], point: &GeoPoint) -> Option<f64> {
    nearest_probability(samples, point.lat, point.lon)
}
