use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkywatchError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SkywatchError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SkywatchError::ApiError(_) => ErrorCategory::Network,
            SkywatchError::CsvError(_)
            | SkywatchError::SerializationError(_)
            | SkywatchError::ProcessingError { .. } => ErrorCategory::Data,
            SkywatchError::IoError(_) => ErrorCategory::Storage,
            SkywatchError::ConfigError { .. }
            | SkywatchError::ConfigValidationError { .. }
            | SkywatchError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // feeds degrade to "unknown", so a network failure alone is retryable
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SkywatchError::ApiError(_) => {
                "Check network connectivity to services.swpc.noaa.gov and retry in a few minutes"
            }
            SkywatchError::CsvError(_) => "Disable table export or check the output directory",
            SkywatchError::IoError(_) => "Check that the output path exists and is writable",
            SkywatchError::SerializationError(_) => "The payload could not be encoded as JSON",
            SkywatchError::ConfigError { .. } => "Review the configuration file syntax",
            SkywatchError::ConfigValidationError { .. }
            | SkywatchError::InvalidConfigValueError { .. } => {
                "Fix the reported configuration value and run again"
            }
            SkywatchError::ProcessingError { .. } => "Re-run with --verbose to inspect the feeds",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SkywatchError::ApiError(e) => format!("Could not reach the data provider: {}", e),
            SkywatchError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            SkywatchError::ConfigValidationError { field, message } => {
                format!("Setting '{}' is invalid: {}", field, message)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SkywatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = SkywatchError::InvalidConfigValueError {
            field: "location.lat".to_string(),
            value: "91".to_string(),
            reason: "Latitude must be within [-90, 90]".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("location.lat"));
    }

    #[test]
    fn test_io_errors_are_critical() {
        let err = SkywatchError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert_eq!(err.category(), ErrorCategory::Storage);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }
}
