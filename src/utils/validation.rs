use crate::utils::error::{Result, SkywatchError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(SkywatchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(SkywatchError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(SkywatchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(SkywatchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(SkywatchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(SkywatchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

/// Inclusive range check for coordinates. NaN and infinities are rejected.
pub fn validate_coordinate(field_name: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(SkywatchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_latitude(field_name: &str, lat: f64) -> Result<()> {
    validate_coordinate(field_name, lat, -90.0, 90.0)
}

/// Longitudes are wrapped before lookup, so any finite value is accepted.
pub fn validate_longitude(field_name: &str, lon: f64) -> Result<()> {
    if !lon.is_finite() {
        return Err(SkywatchError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: lon.to_string(),
            reason: "Longitude must be a finite number".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("sources.ovation", "https://example.com").is_ok());
        assert!(validate_url("sources.ovation", "http://example.com").is_ok());
        assert!(validate_url("sources.ovation", "").is_err());
        assert!(validate_url("sources.ovation", "invalid-url").is_err());
        assert!(validate_url("sources.ovation", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("sources.timeout_seconds", 15, 1).is_ok());
        assert!(validate_positive_number("sources.timeout_seconds", 0, 1).is_err());
    }

    #[test]
    fn test_validate_latitude() {
        assert!(validate_latitude("lat", 59.3).is_ok());
        assert!(validate_latitude("lat", -90.0).is_ok());
        assert!(validate_latitude("lat", 90.5).is_err());
        assert!(validate_latitude("lat", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_longitude_accepts_unwrapped_values() {
        assert!(validate_longitude("lon", 18.1).is_ok());
        assert!(validate_longitude("lon", 540.0).is_ok());
        assert!(validate_longitude("lon", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("output.path", "./output").is_ok());
        assert!(validate_path("output.path", "").is_err());
        assert!(validate_path("output.path", "bad\0path").is_err());
    }
}
