use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A query coordinate, usually picked by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub name: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            name: None,
            lat,
            lon,
        }
    }

    pub fn named(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: Some(name.into()),
            lat,
            lon,
        }
    }

    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("{:.2}, {:.2}", self.lat, self.lon),
        }
    }
}

/// One OVATION grid point. Longitude is stored as delivered and wrapped at lookup time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSample {
    pub lon: f64,
    pub lat: f64,
    pub probability: f64,
}

impl GridSample {
    pub fn new(lon: f64, lat: f64, probability: f64) -> Self {
        Self {
            lon,
            lat,
            probability,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite() && self.probability.is_finite()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OvationGrid {
    pub forecast_time: Option<DateTime<Utc>>,
    pub observation_time: Option<DateTime<Utc>>,
    pub samples: Vec<GridSample>,
}

impl OvationGrid {
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// A normalized table row: an optional instant plus canonical numeric fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesRecord {
    pub timestamp: Option<DateTime<Utc>>,
    pub values: BTreeMap<String, Option<f64>>,
}

impl TimeSeriesRecord {
    pub fn new(timestamp: Option<DateTime<Utc>>) -> Self {
        Self {
            timestamp,
            values: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, field: &str, value: Option<f64>) -> Self {
        self.values.insert(field.to_string(), value);
        self
    }

    /// `None` both when the column was absent and when the cell was unparseable.
    pub fn get(&self, field: &str) -> Option<f64> {
        self.values.get(field).copied().flatten()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalTable {
    pub records: Vec<TimeSeriesRecord>,
}

impl CanonicalTable {
    pub fn new(records: Vec<TimeSeriesRecord>) -> Self {
        Self { records }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted union of every field name present in any record.
    pub fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .records
            .iter()
            .flat_map(|r| r.values.keys().cloned())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolarWindSnapshot {
    pub timestamp: Option<DateTime<Utc>>,
    /// nT, GSM frame
    pub bz_gsm: Option<f64>,
    /// km/s
    pub speed: Option<f64>,
    /// particles/cm³
    pub density: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuroraResult {
    pub chance: f64,
    pub ovation_probability: Option<f64>,
    pub kp: Option<f64>,
    pub bz_gsm: Option<f64>,
    pub speed: Option<f64>,
    pub density: Option<f64>,
    pub note: String,
}

/// Payloads exactly as received from the providers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFeeds {
    pub ovation: serde_json::Value,
    pub kp_forecast: serde_json::Value,
    pub mag: serde_json::Value,
    pub plasma: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFeeds {
    pub ovation: OvationGrid,
    pub kp: CanonicalTable,
    pub mag: CanonicalTable,
    pub plasma: CanonicalTable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChanceBand {
    High,
    Possible,
    Unlikely,
    VeryUnlikely,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuroraReport {
    pub location: GeoPoint,
    pub generated_at: DateTime<Utc>,
    pub forecast_time: Option<DateTime<Utc>>,
    pub solar_wind_time: Option<DateTime<Utc>>,
    pub result: AuroraResult,
    pub band: ChanceBand,
    pub kp_activity: Option<String>,
    #[serde(skip)]
    pub tables: NormalizedFeeds,
}
