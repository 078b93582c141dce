//! Stargazing-conditions score from hourly night weather and moonlight.
//!
//! Each hour gets a 0–100 score blended from cloud cover, visibility, humidity and
//! moon illumination. A component that is unknown for an hour is left out and the
//! remaining weights are renormalized, so a missing humidity reading does not count
//! as perfectly dry air.

use crate::core::normalize::number_from_value;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const CLOUD_WEIGHT: f64 = 0.45;
const VISIBILITY_WEIGHT: f64 = 0.20;
const HUMIDITY_WEIGHT: f64 = 0.15;
const MOON_WEIGHT: f64 = 0.20;

/// Visibility at or beyond this distance counts as perfectly clear.
const CLEAR_VISIBILITY_KM: f64 = 10.0;
/// Relative humidity below this has no effect on the score.
const DRY_HUMIDITY_PCT: f64 = 40.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NightHour {
    /// Provider-local wall clock time.
    pub time: Option<NaiveDateTime>,
    pub cloud_cover: Option<f64>,
    pub visibility_km: Option<f64>,
    pub humidity: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherNight {
    pub moon_phase: Option<String>,
    pub moon_illumination: Option<f64>,
    pub sunset: Option<String>,
    pub hours: Vec<NightHour>,
}

impl WeatherNight {
    pub fn min_cloud_cover(&self) -> Option<f64> {
        self.hours
            .iter()
            .filter_map(|h| h.cloud_cover)
            .reduce(f64::min)
    }

    pub fn max_visibility_km(&self) -> Option<f64> {
        self.hours
            .iter()
            .filter_map(|h| h.visibility_km)
            .reduce(f64::max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StargazingVerdict {
    Incredible,
    PrettyGood,
    Mixed,
    Poor,
}

impl StargazingVerdict {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            StargazingVerdict::Incredible
        } else if score >= 60.0 {
            StargazingVerdict::PrettyGood
        } else if score >= 40.0 {
            StargazingVerdict::Mixed
        } else {
            StargazingVerdict::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StargazingVerdict::Incredible => "✨ Incredible night — go outside!",
            StargazingVerdict::PrettyGood => "🌙 Pretty good — worth a look.",
            StargazingVerdict::Mixed => "🌥 Meh — sky conditions mixed.",
            StargazingVerdict::Poor => "☁ Not a great night for stargazing.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyScore {
    pub time: Option<NaiveDateTime>,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StargazingScore {
    pub overall: Option<f64>,
    pub verdict: Option<StargazingVerdict>,
    pub hourly: Vec<HourlyScore>,
}

fn percent_clear(pct: f64) -> f64 {
    (1.0 - pct / 100.0).clamp(0.0, 1.0)
}

pub fn hour_score(hour: &NightHour, moon_illumination: Option<f64>) -> Option<f64> {
    let finite = |v: Option<f64>| v.filter(|x| x.is_finite());
    let components = [
        (finite(hour.cloud_cover).map(percent_clear), CLOUD_WEIGHT),
        (
            finite(hour.visibility_km).map(|v| (v / CLEAR_VISIBILITY_KM).clamp(0.0, 1.0)),
            VISIBILITY_WEIGHT,
        ),
        (
            finite(hour.humidity)
                .map(|h| ((100.0 - h) / (100.0 - DRY_HUMIDITY_PCT)).clamp(0.0, 1.0)),
            HUMIDITY_WEIGHT,
        ),
        (finite(moon_illumination).map(percent_clear), MOON_WEIGHT),
    ];

    let (weighted, total_weight) = components
        .iter()
        .filter_map(|(value, weight)| value.map(|v| (v * weight, *weight)))
        .fold((0.0, 0.0), |(sum, total), (v, w)| (sum + v, total + w));

    if total_weight > 0.0 {
        Some(100.0 * weighted / total_weight)
    } else {
        None
    }
}

pub fn compute_stargazing_score(night: &WeatherNight) -> StargazingScore {
    let hourly: Vec<HourlyScore> = night
        .hours
        .iter()
        .map(|hour| HourlyScore {
            time: hour.time,
            score: hour_score(hour, night.moon_illumination),
        })
        .collect();

    let known: Vec<f64> = hourly.iter().filter_map(|h| h.score).collect();
    let overall = if known.is_empty() {
        None
    } else {
        Some(known.iter().sum::<f64>() / known.len() as f64)
    };

    StargazingScore {
        overall,
        verdict: overall.map(StargazingVerdict::from_score),
        hourly,
    }
}

/// Night hours and astronomy data from a WeatherAPI-style forecast payload.
///
/// Hours are taken from every `forecast.forecastday[].hour[]` entry with
/// `is_day == 0`; astronomy fields come from the first forecast day. Anything
/// unrecognized is skipped.
pub fn normalize_weather(payload: &Value) -> WeatherNight {
    let days = payload
        .pointer("/forecast/forecastday")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let astro = days.first().and_then(|d| d.get("astro"));
    let astro_text = |key: &str| {
        astro
            .and_then(|a| a.get(key))
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };

    let hours = days
        .iter()
        .filter_map(|d| d.get("hour").and_then(Value::as_array))
        .flatten()
        .filter(|h| h.get("is_day").and_then(number_from_value) == Some(0.0))
        .map(|h| NightHour {
            time: h
                .get("time")
                .and_then(Value::as_str)
                .and_then(|t| NaiveDateTime::parse_from_str(t.trim(), "%Y-%m-%d %H:%M").ok()),
            cloud_cover: h.get("cloud").and_then(number_from_value),
            visibility_km: h.get("vis_km").and_then(number_from_value),
            humidity: h.get("humidity").and_then(number_from_value),
        })
        .collect();

    WeatherNight {
        moon_phase: astro_text("moon_phase"),
        moon_illumination: astro
            .and_then(|a| a.get("moon_illumination"))
            .and_then(number_from_value),
        sunset: astro_text("sunset"),
        hours,
    }
}
