use crate::adapters::http::DEFAULT_TIMEOUT_SECONDS;
use crate::config::{
    validate_provider, DEFAULT_OUTPUT_PATH, KP_FORECAST_URL, OVATION_URL, SOLAR_WIND_MAG_URL,
    SOLAR_WIND_PLASMA_URL,
};
use crate::domain::model::GeoPoint;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, SkywatchError};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub location: LocationConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub output: OutputConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    pub name: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourcesConfig {
    pub ovation: Option<String>,
    pub kp_forecast: Option<String>,
    pub mag: Option<String>,
    pub plasma: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
    pub export_tables: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SkywatchError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SkywatchError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR_NAME}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SkywatchError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn location(&self) -> GeoPoint {
        GeoPoint {
            name: self.location.name.clone(),
            lat: self.location.lat,
            lon: self.location.lon,
        }
    }

    fn ovation_url(&self) -> &str {
        self.sources.ovation.as_deref().unwrap_or(OVATION_URL)
    }

    fn kp_forecast_url(&self) -> &str {
        self.sources
            .kp_forecast
            .as_deref()
            .unwrap_or(KP_FORECAST_URL)
    }

    fn mag_url(&self) -> &str {
        self.sources.mag.as_deref().unwrap_or(SOLAR_WIND_MAG_URL)
    }

    fn plasma_url(&self) -> &str {
        self.sources
            .plasma
            .as_deref()
            .unwrap_or(SOLAR_WIND_PLASMA_URL)
    }

    fn timeout_seconds(&self) -> u64 {
        self.sources
            .timeout_seconds
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    fn output_path(&self) -> &str {
        self.output.path.as_deref().unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    fn export_tables(&self) -> bool {
        self.output.export_tables.unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_minimal_config_uses_noaa_defaults() {
        let toml_content = r#"
[location]
name = "Kiruna"
lat = 67.86
lon = 20.23
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.location(), GeoPoint::named("Kiruna", 67.86, 20.23));
        assert_eq!(config.ovation_url(), OVATION_URL);
        assert_eq!(config.plasma_url(), SOLAR_WIND_PLASMA_URL);
        assert_eq!(config.timeout_seconds(), DEFAULT_TIMEOUT_SECONDS);
        assert_eq!(config.output_path(), DEFAULT_OUTPUT_PATH);
        assert!(!config.export_tables());
        assert!(!config.verbose());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[location]
lat = 59.3
lon = 18.1

[sources]
ovation = "http://localhost:8080/ovation.json"
kp_forecast = "http://localhost:8080/kp.json"
mag = "http://localhost:8080/mag.json"
plasma = "http://localhost:8080/plasma.json"
timeout_seconds = 3

[output]
path = "./aurora"
export_tables = true

[logging]
verbose = true
json = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.location().name, None);
        assert_eq!(config.kp_forecast_url(), "http://localhost:8080/kp.json");
        assert_eq!(config.timeout_seconds(), 3);
        assert_eq!(config.output_path(), "./aurora");
        assert!(config.export_tables());
        assert!(config.verbose());
        assert!(config.json_logs());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SKYWATCH_TEST_OVATION", "https://mirror.example.com/ovation.json");

        let toml_content = r#"
[location]
lat = 59.3
lon = 18.1

[sources]
ovation = "${SKYWATCH_TEST_OVATION}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.ovation_url(), "https://mirror.example.com/ovation.json");

        std::env::remove_var("SKYWATCH_TEST_OVATION");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[location]
lat = 123.0
lon = 18.1

[sources]
mag = "invalid-url"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_location_is_parse_error() {
        let err = TomlConfig::from_toml_str("[output]\npath = \"./x\"\n").unwrap_err();
        assert!(matches!(err, SkywatchError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[location]
name = "Abisko"
lat = 68.35
lon = 18.83
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.location.name.as_deref(), Some("Abisko"));
    }
}
