use crate::adapters::http::FeedClient;
use crate::core::fusion::score_location;
use crate::core::normalize::normalize_feeds;
use crate::core::report::{kp_activity_message, render_text};
use crate::core::signal::{latest_kp, solar_wind_now};
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{
    AuroraReport, CanonicalTable, ChanceBand, GeoPoint, OvationGrid, RawFeeds,
};
use crate::utils::error::{Result, SkywatchError};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};

pub const REPORT_JSON: &str = "aurora_report.json";
pub const REPORT_TEXT: &str = "aurora_report.txt";
pub const KP_CSV: &str = "kp_forecast.csv";
pub const MAG_CSV: &str = "solar_wind_mag.csv";
pub const PLASMA_CSV: &str = "solar_wind_plasma.csv";
pub const OVATION_CSV: &str = "ovation_grid.csv";

pub struct AuroraPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: FeedClient,
}

impl<S: Storage, C: ConfigProvider> AuroraPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let client = FeedClient::new(config.timeout_seconds())?;
        Ok(Self {
            storage,
            config,
            client,
        })
    }

    pub fn config(&self) -> &C {
        &self.config
    }
}

/// normalize → lookup/extract → fuse, for one location.
pub fn build_report(feeds: &RawFeeds, location: GeoPoint, generated_at: DateTime<Utc>) -> AuroraReport {
    let tables = normalize_feeds(feeds);
    let kp = latest_kp(&tables.kp);
    let wind = solar_wind_now(&tables.mag, &tables.plasma);
    let result = score_location(&tables.ovation.samples, &location, kp, &wind);

    AuroraReport {
        band: ChanceBand::from_chance(result.chance),
        kp_activity: result.kp.map(|kp| kp_activity_message(kp).to_string()),
        forecast_time: tables.ovation.forecast_time,
        solar_wind_time: wind.timestamp,
        location,
        generated_at,
        result,
        tables,
    }
}

pub fn canonical_table_csv(table: &CanonicalTable) -> Result<Vec<u8>> {
    let fields = table.field_names();
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["time_utc".to_string()];
    header.extend(fields.iter().cloned());
    writer.write_record(&header)?;

    for record in &table.records {
        let mut row = vec![record
            .timestamp
            .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_default()];
        row.extend(
            fields
                .iter()
                .map(|f| record.get(f).map(|v| v.to_string()).unwrap_or_default()),
        );
        writer.write_record(&row)?;
    }

    finish_csv(writer)
}

pub fn ovation_grid_csv(grid: &OvationGrid) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["lon", "lat", "probability"])?;
    for sample in &grid.samples {
        writer.write_record(&[
            sample.lon.to_string(),
            sample.lat.to_string(),
            sample.probability.to_string(),
        ])?;
    }
    finish_csv(writer)
}

fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| SkywatchError::ProcessingError {
            message: format!("failed to flush CSV: {}", e),
        })
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for AuroraPipeline<S, C> {
    async fn extract(&self) -> Result<RawFeeds> {
        // solar wind outages are common; the core treats [] as "unknown"
        let (ovation, kp_forecast, mag, plasma) = tokio::join!(
            self.client
                .fetch_json_or("OVATION", self.config.ovation_url(), Value::Null),
            self.client
                .fetch_json_or("Kp forecast", self.config.kp_forecast_url(), Value::Null),
            self.client
                .fetch_json_or("Solar wind mag", self.config.mag_url(), json!([])),
            self.client
                .fetch_json_or("Solar wind plasma", self.config.plasma_url(), json!([])),
        );

        Ok(RawFeeds {
            ovation,
            kp_forecast,
            mag,
            plasma,
        })
    }

    async fn transform(&self, feeds: RawFeeds) -> Result<AuroraReport> {
        let report = build_report(&feeds, self.config.location(), Utc::now());

        tracing::debug!(
            "Normalized feeds: {} grid points, {} Kp rows, {} mag rows, {} plasma rows",
            report.tables.ovation.samples.len(),
            report.tables.kp.len(),
            report.tables.mag.len(),
            report.tables.plasma.len()
        );
        if report.tables.ovation.is_empty() {
            tracing::warn!("No OVATION grid points, aurora chance forced to 0");
        }

        Ok(report)
    }

    async fn load(&self, report: AuroraReport) -> Result<String> {
        let output_path = format!("{}/{}", self.config.output_path(), REPORT_JSON);

        let json_data = serde_json::to_string_pretty(&report)?;
        self.storage
            .write_file(REPORT_JSON, json_data.as_bytes())
            .await?;
        self.storage
            .write_file(REPORT_TEXT, render_text(&report).as_bytes())
            .await?;

        if self.config.export_tables() {
            tracing::debug!("Exporting normalized tables as CSV");
            let tables = &report.tables;
            self.storage
                .write_file(KP_CSV, &canonical_table_csv(&tables.kp)?)
                .await?;
            self.storage
                .write_file(MAG_CSV, &canonical_table_csv(&tables.mag)?)
                .await?;
            self.storage
                .write_file(PLASMA_CSV, &canonical_table_csv(&tables.plasma)?)
                .await?;
            self.storage
                .write_file(OVATION_CSV, &ovation_grid_csv(&tables.ovation)?)
                .await?;
        }

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fusion::{OVATION_UNAVAILABLE, VERDICT_SOUTHWARD};
    use crate::core::normalize::FIELD_KP;
    use crate::domain::model::{GridSample, TimeSeriesRecord};
    use chrono::TimeZone;
    use httpmock::prelude::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                SkywatchError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "File not found",
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        base_url: String,
        export_tables: bool,
    }

    impl ConfigProvider for MockConfig {
        fn location(&self) -> GeoPoint {
            GeoPoint::named("Stockholm", 59.3, 18.1)
        }

        fn ovation_url(&self) -> &str {
            &self.base_url
        }

        fn kp_forecast_url(&self) -> &str {
            &self.base_url
        }

        fn mag_url(&self) -> &str {
            &self.base_url
        }

        fn plasma_url(&self) -> &str {
            &self.base_url
        }

        fn timeout_seconds(&self) -> u64 {
            2
        }

        fn output_path(&self) -> &str {
            "./test-output"
        }

        fn export_tables(&self) -> bool {
            self.export_tables
        }
    }

    fn stockholm_feeds() -> RawFeeds {
        RawFeeds {
            ovation: json!({
                "Forecast Time": "2025-12-19T21:30:00Z",
                "coordinates": [[10, 59, 40], [170, -10, 90]]
            }),
            kp_forecast: json!([
                ["time_tag", "kp", "observed", "noaa_scale"],
                ["2025-12-19 15:00:00", "4.33", "observed", null],
                ["2025-12-19 18:00:00", "6.00", "estimated", "G2"]
            ]),
            mag: json!([
                ["time_tag", "bx_gsm", "by_gsm", "bz_gsm", "lon_gsm", "lat_gsm", "bt"],
                ["2025-12-19 21:00:00.000", "1.2", "3.4", "-8.0", "70.1", "-40.2", "9.6"]
            ]),
            plasma: json!([
                ["time_tag", "density", "speed", "temperature"],
                ["2025-12-19 21:00:00.000", "4.5", "500.0", "120000"]
            ]),
        }
    }

    #[test]
    fn test_build_report_end_to_end() {
        let generated_at = Utc.with_ymd_and_hms(2025, 12, 19, 21, 5, 0).unwrap();
        let report = build_report(
            &stockholm_feeds(),
            GeoPoint::named("Stockholm", 59.3, 18.1),
            generated_at,
        );

        let result = &report.result;
        assert_eq!(result.ovation_probability, Some(40.0));
        assert_eq!(result.kp, Some(6.0));
        assert_eq!(result.bz_gsm, Some(-8.0));
        assert_eq!(result.speed, Some(500.0));
        assert_eq!(result.density, Some(4.5));
        assert!(result.chance > 55.0 && result.chance < 62.0);
        assert!(result.note.starts_with(VERDICT_SOUTHWARD));
        assert_eq!(report.band, ChanceBand::Possible);
        assert!(report.kp_activity.is_some());
        assert!(report.forecast_time.is_some());
        assert_eq!(
            report.solar_wind_time,
            Some(Utc.with_ymd_and_hms(2025, 12, 19, 21, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_build_report_with_empty_feeds() {
        let feeds = RawFeeds {
            ovation: Value::Null,
            kp_forecast: Value::Null,
            mag: json!([]),
            plasma: json!([]),
        };
        let report = build_report(&feeds, GeoPoint::new(59.3, 18.1), Utc::now());

        assert_eq!(report.result.chance, 0.0);
        assert_eq!(report.result.note, OVATION_UNAVAILABLE);
        assert_eq!(report.band, ChanceBand::VeryUnlikely);
        assert_eq!(report.kp_activity, None);
    }

    #[test]
    fn test_canonical_table_csv() {
        let table = CanonicalTable::new(vec![
            TimeSeriesRecord::new(Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()))
                .with_value(FIELD_KP, Some(3.67)),
            TimeSeriesRecord::new(None).with_value(FIELD_KP, None),
        ]);
        let csv = String::from_utf8(canonical_table_csv(&table).unwrap()).unwrap();
        assert_eq!(csv, "time_utc,kp\n2025-01-01T00:00:00Z,3.67\n,\n");
    }

    #[test]
    fn test_ovation_grid_csv() {
        let grid = OvationGrid {
            samples: vec![GridSample::new(10.0, 59.0, 40.0)],
            ..Default::default()
        };
        let csv = String::from_utf8(ovation_grid_csv(&grid).unwrap()).unwrap();
        assert_eq!(csv, "lon,lat,probability\n10,59,40\n");
    }

    #[tokio::test]
    async fn test_extract_degrades_failed_feeds() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/feed");
            then.status(500);
        });

        let config = MockConfig {
            base_url: server.url("/feed"),
            export_tables: false,
        };
        let pipeline = AuroraPipeline::new(MockStorage::new(), config).unwrap();
        let feeds = pipeline.extract().await.unwrap();

        api_mock.assert_hits(4);
        assert_eq!(feeds.ovation, Value::Null);
        assert_eq!(feeds.kp_forecast, Value::Null);
        assert_eq!(feeds.mag, json!([]));
        assert_eq!(feeds.plasma, json!([]));
    }

    #[tokio::test]
    async fn test_load_writes_report_and_tables() {
        let storage = MockStorage::new();
        let config = MockConfig {
            base_url: "http://localhost".to_string(),
            export_tables: true,
        };
        let pipeline = AuroraPipeline::new(storage.clone(), config).unwrap();

        let report = pipeline.transform(stockholm_feeds()).await.unwrap();
        let output_path = pipeline.load(report).await.unwrap();
        assert_eq!(output_path, "./test-output/aurora_report.json");

        let json_bytes = storage.get_file(REPORT_JSON).await.unwrap();
        let saved: Value = serde_json::from_slice(&json_bytes).unwrap();
        assert_eq!(saved["result"]["ovation_probability"], 40.0);
        assert_eq!(saved["band"], "possible");
        assert!(saved.get("tables").is_none());

        let text = String::from_utf8(storage.get_file(REPORT_TEXT).await.unwrap()).unwrap();
        assert!(text.contains("Stockholm"));

        let kp_csv = String::from_utf8(storage.get_file(KP_CSV).await.unwrap()).unwrap();
        assert!(kp_csv.starts_with("time_utc,kp\n"));
        assert!(storage.get_file(MAG_CSV).await.is_some());
        assert!(storage.get_file(PLASMA_CSV).await.is_some());
        assert!(storage.get_file(OVATION_CSV).await.is_some());
    }

    #[tokio::test]
    async fn test_load_without_table_export() {
        let storage = MockStorage::new();
        let config = MockConfig {
            base_url: "http://localhost".to_string(),
            export_tables: false,
        };
        let pipeline = AuroraPipeline::new(storage.clone(), config).unwrap();

        let report = pipeline.transform(stockholm_feeds()).await.unwrap();
        pipeline.load(report).await.unwrap();

        assert!(storage.get_file(REPORT_JSON).await.is_some());
        assert!(storage.get_file(KP_CSV).await.is_none());
    }
}
