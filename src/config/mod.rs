#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation;

// NOAA SWPC endpoints, no keys required
pub const OVATION_URL: &str = "https://services.swpc.noaa.gov/json/ovation_aurora_latest.json";
pub const KP_FORECAST_URL: &str =
    "https://services.swpc.noaa.gov/products/noaa-planetary-k-index-forecast.json";
pub const SOLAR_WIND_MAG_URL: &str =
    "https://services.swpc.noaa.gov/products/solar-wind/mag-1-day.json";
pub const SOLAR_WIND_PLASMA_URL: &str =
    "https://services.swpc.noaa.gov/products/solar-wind/plasma-1-day.json";

pub const DEFAULT_OUTPUT_PATH: &str = "./output";

/// Checks shared by every configuration source.
pub fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    let location = config.location();
    validation::validate_latitude("location.lat", location.lat)?;
    validation::validate_longitude("location.lon", location.lon)?;

    validation::validate_url("sources.ovation", config.ovation_url())?;
    validation::validate_url("sources.kp_forecast", config.kp_forecast_url())?;
    validation::validate_url("sources.mag", config.mag_url())?;
    validation::validate_url("sources.plasma", config.plasma_url())?;
    validation::validate_positive_number("sources.timeout_seconds", config.timeout_seconds(), 1)?;

    validation::validate_path("output.path", config.output_path())?;
    Ok(())
}
