//! Latest-valid-value extraction from normalized time series.

use crate::core::normalize::{FIELD_BZ_GSM, FIELD_DENSITY, FIELD_KP, FIELD_SPEED};
use crate::domain::model::{CanonicalTable, SolarWindSnapshot, TimeSeriesRecord};
use chrono::{DateTime, Utc};

/// Records in "most recent last" order.
///
/// When every record carries a timestamp they are stably sorted by it; as soon as
/// one is missing the arrival order is used as-is.
pub fn chronological(records: &[TimeSeriesRecord]) -> Vec<&TimeSeriesRecord> {
    let mut ordered: Vec<&TimeSeriesRecord> = records.iter().collect();
    if records.iter().all(|r| r.timestamp.is_some()) {
        ordered.sort_by_key(|r| r.timestamp);
    }
    ordered
}

/// Value of `field` from the most recent record where it is known.
pub fn latest_value(records: &[TimeSeriesRecord], field: &str) -> Option<f64> {
    chronological(records)
        .into_iter()
        .rev()
        .find_map(|r| r.get(field))
}

pub fn latest_timestamp(records: &[TimeSeriesRecord]) -> Option<DateTime<Utc>> {
    chronological(records)
        .into_iter()
        .rev()
        .find_map(|r| r.timestamp)
}

pub fn latest_kp(kp: &CanonicalTable) -> Option<f64> {
    latest_value(&kp.records, FIELD_KP)
}

pub fn solar_wind_now(mag: &CanonicalTable, plasma: &CanonicalTable) -> SolarWindSnapshot {
    SolarWindSnapshot {
        timestamp: latest_timestamp(&plasma.records).or_else(|| latest_timestamp(&mag.records)),
        bz_gsm: latest_value(&mag.records, FIELD_BZ_GSM),
        speed: latest_value(&plasma.records, FIELD_SPEED),
        density: latest_value(&plasma.records, FIELD_DENSITY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(2025, 12, 19, hour, 0, 0).unwrap())
    }

    fn kp_record(ts: Option<DateTime<Utc>>, kp: Option<f64>) -> TimeSeriesRecord {
        TimeSeriesRecord::new(ts).with_value(FIELD_KP, kp)
    }

    #[test]
    fn test_sorts_by_timestamp_when_all_present() {
        let records = vec![
            kp_record(at(6), Some(5.0)),
            kp_record(at(0), Some(2.0)),
            kp_record(at(3), Some(3.0)),
        ];
        assert_eq!(latest_value(&records, FIELD_KP), Some(5.0));
    }

    #[test]
    fn test_skips_trailing_unknowns() {
        let records = vec![
            kp_record(at(0), Some(2.0)),
            kp_record(at(3), Some(3.33)),
            kp_record(at(6), None),
            kp_record(at(9), None),
        ];
        assert_eq!(latest_value(&records, FIELD_KP), Some(3.33));
    }

    #[test]
    fn test_arrival_order_when_a_timestamp_is_missing() {
        let records = vec![
            kp_record(at(9), Some(6.0)),
            kp_record(None, Some(1.0)),
            kp_record(at(0), Some(2.0)),
        ];
        // no sort: the last record in arrival order wins
        assert_eq!(latest_value(&records, FIELD_KP), Some(2.0));
    }

    #[test]
    fn test_unknown_only_when_every_value_missing() {
        let records = vec![kp_record(at(0), None), kp_record(None, None)];
        assert_eq!(latest_value(&records, FIELD_KP), None);
        assert_eq!(latest_value(&[], FIELD_KP), None);
        assert_eq!(latest_value(&records, "absent_field"), None);
    }

    #[test]
    fn test_zero_is_a_value() {
        let records = vec![kp_record(at(0), Some(4.0)), kp_record(at(3), Some(0.0))];
        assert_eq!(latest_value(&records, FIELD_KP), Some(0.0));
    }

    #[test]
    fn test_solar_wind_snapshot_combines_products() {
        let mag = CanonicalTable::new(vec![
            TimeSeriesRecord::new(at(1)).with_value(FIELD_BZ_GSM, Some(-3.0)),
            TimeSeriesRecord::new(at(2)).with_value(FIELD_BZ_GSM, Some(-8.2)),
        ]);
        let plasma = CanonicalTable::new(vec![
            TimeSeriesRecord::new(at(2))
                .with_value(FIELD_SPEED, Some(480.0))
                .with_value(FIELD_DENSITY, Some(3.1)),
            TimeSeriesRecord::new(at(3))
                .with_value(FIELD_SPEED, Some(505.0))
                .with_value(FIELD_DENSITY, None),
        ]);

        let now = solar_wind_now(&mag, &plasma);
        assert_eq!(now.timestamp, at(3));
        assert_eq!(now.bz_gsm, Some(-8.2));
        assert_eq!(now.speed, Some(505.0));
        assert_eq!(now.density, Some(3.1));
    }

    #[test]
    fn test_solar_wind_timestamp_falls_back_to_mag() {
        let mag = CanonicalTable::new(vec![
            TimeSeriesRecord::new(at(4)).with_value(FIELD_BZ_GSM, Some(1.0)),
        ]);
        let now = solar_wind_now(&mag, &CanonicalTable::empty());
        assert_eq!(now.timestamp, at(4));
        assert_eq!(now.speed, None);
        assert_eq!(now.density, None);
    }
}
