//! Converts raw NOAA SWPC payloads into canonical tables and grids.
//!
//! Nothing in here returns an error. A payload that does not have the expected
//! shape becomes an empty table or grid, and a cell that cannot be parsed becomes
//! `None`. Upstream feeds change shape without notice, so callers must be able to
//! score with whatever survived.

use crate::domain::model::{
    CanonicalTable, GridSample, NormalizedFeeds, OvationGrid, RawFeeds, TimeSeriesRecord,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};

pub const FIELD_KP: &str = "kp";
pub const FIELD_BZ_GSM: &str = "bz_gsm";
pub const FIELD_BT: &str = "bt";
pub const FIELD_SPEED: &str = "speed";
pub const FIELD_DENSITY: &str = "density";

pub const KP_TIME_CANDIDATES: &[&str] = &["time_tag", "time", "datetime", "timestamp"];
pub const SOLAR_WIND_TIME_CANDIDATES: &[&str] = &["time_tag", "time", "timestamp"];

pub const KP_CANDIDATES: &[&str] = &["kp", "kp_index", "kp_value"];
pub const BZ_CANDIDATES: &[&str] = &["bz_gsm", "bz", "bz_gse", "bz_bt", "bzgsm"];
pub const BT_CANDIDATES: &[&str] = &["bt", "bt_gsm"];
pub const SPEED_CANDIDATES: &[&str] = &["speed", "proton_speed", "flow_speed", "v_sw", "vx"];
pub const DENSITY_CANDIDATES: &[&str] = &["density", "proton_density", "np", "n_p", "dens"];

const OVATION_COORD_KEYS: &[&str] = &["coordinates", "Coordinates"];
const OVATION_FORECAST_KEYS: &[&str] = &["Forecast Time", "forecast_time", "time"];
const OVATION_OBSERVATION_KEYS: &[&str] = &["Observation Time", "observation_time"];

/// Table-row JSON after shape checking: a header plus rows of optional cell text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl JsonTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col)?.as_deref()
    }
}

/// Header row of strings followed by at least one data row.
pub fn is_table_json(payload: &Value) -> bool {
    match payload.as_array() {
        Some(items) if items.len() > 1 => items[0]
            .as_array()
            .is_some_and(|header| header.iter().all(Value::is_string)),
        _ => false,
    }
}

pub fn parse_table_json(payload: &Value) -> JsonTable {
    if !is_table_json(payload) {
        return JsonTable::default();
    }
    let Some(items) = payload.as_array() else {
        return JsonTable::default();
    };

    let header: Vec<String> = items[0]
        .as_array()
        .map(|cells| {
            cells
                .iter()
                .map(|c| c.as_str().unwrap_or_default().to_string())
                .collect()
        })
        .unwrap_or_default();

    let rows = items
        .iter()
        .skip(1)
        .filter_map(Value::as_array)
        .map(|cells| {
            (0..header.len())
                .map(|idx| cells.get(idx).and_then(cell_text))
                .collect()
        })
        .collect();

    JsonTable { header, rows }
}

fn cell_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if text.is_empty() || text.eq_ignore_ascii_case("null") {
        None
    } else {
        Some(text)
    }
}

/// Resolve a column by trying `candidates` in order, case-insensitively.
///
/// Candidate order wins over header order: with header `["bz", "bz_gsm"]` and
/// candidates `["bz_gsm", "bz"]` the second column is returned. Every parser in
/// this module goes through here so vendor renames resolve the same way everywhere.
pub fn pick_column(header: &[String], candidates: &[&str]) -> Option<usize> {
    candidates.iter().find_map(|candidate| {
        let candidate = candidate.trim();
        header
            .iter()
            .position(|name| name.trim().eq_ignore_ascii_case(candidate))
    })
}

pub fn is_time_column(name: &str) -> bool {
    let lower = name.trim().to_ascii_lowercase();
    lower.contains("time") || lower.ends_with("_tag")
}

/// Candidate list first, then any column that looks like a time column.
pub fn find_time_column(header: &[String], candidates: &[&str]) -> Option<usize> {
    pick_column(header, candidates).or_else(|| header.iter().position(|h| is_time_column(h)))
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let value = raw.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("null") {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&dt));
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| Utc.from_utc_datetime(&dt))
}

pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

pub(crate) fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

/// Project a table onto canonical fields. A field whose column cannot be resolved
/// is left out of every record; a cell that does not parse is kept as `None`.
pub fn table_to_canonical(
    table: &JsonTable,
    time_candidates: &[&str],
    fields: &[(&str, &[&str])],
) -> CanonicalTable {
    let time_idx = find_time_column(&table.header, time_candidates);
    let field_idx: Vec<(&str, usize)> = fields
        .iter()
        .filter_map(|(name, candidates)| {
            pick_column(&table.header, candidates).map(|idx| (*name, idx))
        })
        .collect();

    let records = (0..table.rows.len())
        .map(|row| {
            let timestamp = time_idx
                .and_then(|col| table.cell(row, col))
                .and_then(parse_timestamp);
            field_idx
                .iter()
                .fold(TimeSeriesRecord::new(timestamp), |record, (name, col)| {
                    let value = table.cell(row, *col).and_then(parse_number);
                    record.with_value(name, value)
                })
        })
        .collect();

    CanonicalTable::new(records)
}

pub fn normalize_kp_forecast(payload: &Value) -> CanonicalTable {
    let table = parse_table_json(payload);
    table_to_canonical(&table, KP_TIME_CANDIDATES, &[(FIELD_KP, KP_CANDIDATES)])
}

pub fn normalize_mag(payload: &Value) -> CanonicalTable {
    let table = parse_table_json(payload);
    table_to_canonical(
        &table,
        SOLAR_WIND_TIME_CANDIDATES,
        &[(FIELD_BZ_GSM, BZ_CANDIDATES), (FIELD_BT, BT_CANDIDATES)],
    )
}

pub fn normalize_plasma(payload: &Value) -> CanonicalTable {
    let table = parse_table_json(payload);
    table_to_canonical(
        &table,
        SOLAR_WIND_TIME_CANDIDATES,
        &[(FIELD_SPEED, SPEED_CANDIDATES), (FIELD_DENSITY, DENSITY_CANDIDATES)],
    )
}

pub fn normalize_ovation(payload: &Value) -> OvationGrid {
    let Some(obj) = payload.as_object() else {
        return OvationGrid::default();
    };

    let samples: Vec<GridSample> = OVATION_COORD_KEYS
        .iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_array))
        .map(|items| items.iter().filter_map(parse_triple).collect())
        .unwrap_or_default();

    OvationGrid {
        forecast_time: first_timestamp(obj, OVATION_FORECAST_KEYS),
        observation_time: first_timestamp(obj, OVATION_OBSERVATION_KEYS),
        samples,
    }
}

// [lon, lat, probability]; a triple with any unusable member is dropped.
fn parse_triple(value: &Value) -> Option<GridSample> {
    let items = value.as_array()?;
    let lon = number_from_value(items.first()?)?;
    let lat = number_from_value(items.get(1)?)?;
    let probability = number_from_value(items.get(2)?)?;
    Some(GridSample::new(lon, lat, probability))
}

fn first_timestamp(obj: &Map<String, Value>, keys: &[&str]) -> Option<DateTime<Utc>> {
    keys.iter()
        .filter_map(|key| obj.get(*key).and_then(Value::as_str))
        .find_map(parse_timestamp)
}

pub fn normalize_feeds(feeds: &RawFeeds) -> NormalizedFeeds {
    NormalizedFeeds {
        ovation: normalize_ovation(&feeds.ovation),
        kp: normalize_kp_forecast(&feeds.kp_forecast),
        mag: normalize_mag(&feeds.mag),
        plasma: normalize_plasma(&feeds.plasma),
    }
}
