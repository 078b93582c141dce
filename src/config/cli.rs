use crate::adapters::http::DEFAULT_TIMEOUT_SECONDS;
use crate::config::{
    validate_provider, DEFAULT_OUTPUT_PATH, KP_FORECAST_URL, OVATION_URL, SOLAR_WIND_MAG_URL,
    SOLAR_WIND_PLASMA_URL,
};
use crate::domain::model::GeoPoint;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "skywatch")]
#[command(about = "Northern Lights chance for a location from live NOAA space-weather feeds")]
pub struct CliConfig {
    /// Latitude of the observer in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude of the observer in degrees (any range, wrapped)
    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,

    #[arg(long)]
    pub location_name: Option<String>,

    #[arg(long, default_value = OVATION_URL)]
    pub ovation_url: String,

    #[arg(long, default_value = KP_FORECAST_URL)]
    pub kp_forecast_url: String,

    #[arg(long, default_value = SOLAR_WIND_MAG_URL)]
    pub mag_url: String,

    #[arg(long, default_value = SOLAR_WIND_PLASMA_URL)]
    pub plasma_url: String,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output_path: String,

    #[arg(long, help = "Also write the normalized feeds as CSV")]
    pub export_tables: bool,

    #[arg(long, help = "Log as JSON lines instead of compact text")]
    pub json_logs: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// NOAA defaults for everything but the location.
    pub fn for_location(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            location_name: None,
            ovation_url: OVATION_URL.to_string(),
            kp_forecast_url: KP_FORECAST_URL.to_string(),
            mag_url: SOLAR_WIND_MAG_URL.to_string(),
            plasma_url: SOLAR_WIND_PLASMA_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            export_tables: false,
            json_logs: false,
            verbose: false,
        }
    }
}

impl ConfigProvider for CliConfig {
    fn location(&self) -> GeoPoint {
        GeoPoint {
            name: self.location_name.clone(),
            lat: self.lat,
            lon: self.lon,
        }
    }

    fn ovation_url(&self) -> &str {
        &self.ovation_url
    }

    fn kp_forecast_url(&self) -> &str {
        &self.kp_forecast_url
    }

    fn mag_url(&self) -> &str {
        &self.mag_url
    }

    fn plasma_url(&self) -> &str {
        &self.plasma_url
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn export_tables(&self) -> bool {
        self.export_tables
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
