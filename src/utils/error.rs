use crate::domain::model::AddressField;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid {field} address: {message}")]
    InvalidAddress { field: AddressField, message: String },

    #[error("Geocoding failed: {message}")]
    GeocodingError { message: String },

    #[error("Batch row {line}: {message}")]
    BatchRowError { line: usize, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Configuration,
    Validation,
    Geocoding,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl QuoteError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            QuoteError::IoError(_) => ErrorCategory::Io,
            QuoteError::ConfigError { .. } | QuoteError::ConfigValidationError { .. } => {
                ErrorCategory::Configuration
            }
            QuoteError::InvalidValueError { .. } | QuoteError::InvalidAddress { .. } => {
                ErrorCategory::Validation
            }
            QuoteError::GeocodingError { .. } => ErrorCategory::Geocoding,
            QuoteError::SerializationError(_)
            | QuoteError::CsvError(_)
            | QuoteError::BatchRowError { .. } => ErrorCategory::Data,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Geocoding => ErrorSeverity::Medium,
            ErrorCategory::Validation | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            QuoteError::IoError(_) => "Check that the file exists and is readable",
            QuoteError::SerializationError(_) => "Check the JSON payload format",
            QuoteError::CsvError(_) | QuoteError::BatchRowError { .. } => {
                "Check the CSV header and that every numeric column parses"
            }
            QuoteError::ConfigError { .. } | QuoteError::ConfigValidationError { .. } => {
                "Check the TOML configuration file syntax and values"
            }
            QuoteError::InvalidValueError { .. } => "Correct the highlighted field and try again",
            QuoteError::InvalidAddress { .. } => "Please check the address and try again",
            QuoteError::GeocodingError { .. } => "Retry later; the geocoding service may be busy",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            QuoteError::InvalidAddress { field, message } => {
                format!("The {} address could not be validated: {}", field, message)
            }
            QuoteError::GeocodingError { .. } => {
                "Failed to validate location, please try again".to_string()
            }
            QuoteError::InvalidValueError { field, reason, .. } => {
                format!("{}: {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, QuoteError>;
