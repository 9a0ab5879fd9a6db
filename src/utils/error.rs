use thiserror::Error;

/// Configuration errors that block a calibration session from starting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Tag item is required.")]
    EmptyTag,

    #[error("URV must be greater than LRV (LRV = {lower}, URV = {upper}).")]
    InvertedRange { lower: f64, upper: f64 },
}

/// Raised when a report or verdict is requested before any reading was entered.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("No measurements recorded. Enter at least one mA reading.")]
pub struct NoDataError;

#[derive(Error, Debug)]
pub enum CalibrationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NoData(#[from] NoDataError),

    #[error("No calibration has been started")]
    NotConfigured,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CalibrationError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CalibrationError::NoData(_) => ErrorSeverity::Low,
            CalibrationError::Validation(_)
            | CalibrationError::InvalidConfigValueError { .. }
            | CalibrationError::ConfigValidationError { .. } => ErrorSeverity::Medium,
            CalibrationError::NotConfigured => ErrorSeverity::High,
            CalibrationError::IoError(_)
            | CalibrationError::CsvError(_)
            | CalibrationError::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CalibrationError::Validation(e) => e.to_string(),
            CalibrationError::NoData(e) => e.to_string(),
            CalibrationError::NotConfigured => {
                "Start a calibration before entering readings.".to_string()
            }
            CalibrationError::IoError(e) => format!("Could not read or write a file: {}", e),
            CalibrationError::CsvError(e) => format!("Could not write the CSV report: {}", e),
            CalibrationError::SerializationError(e) => {
                format!("Could not write the JSON report: {}", e)
            }
            CalibrationError::ConfigValidationError { field, message } => {
                format!("Calibration sheet is invalid ({}): {}", field, message)
            }
            CalibrationError::InvalidConfigValueError {
                field,
                value,
                reason,
            } => format!("{} = '{}' is not accepted: {}", field, value, reason),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CalibrationError::Validation(ValidationError::EmptyTag) => {
                "Fill in the tag item, e.g. PT-101A"
            }
            CalibrationError::Validation(ValidationError::InvertedRange { .. }) => {
                "Set the upper range value above the lower range value"
            }
            CalibrationError::NoData(_) => "Enter a mA reading for at least one point",
            CalibrationError::NotConfigured => "Submit the calibration configuration first",
            CalibrationError::IoError(_) => "Check that the path exists and is writable",
            CalibrationError::CsvError(_) | CalibrationError::SerializationError(_) => {
                "Check the output directory and try the export again"
            }
            CalibrationError::ConfigValidationError { .. } => {
                "Make sure the file exists and is valid TOML"
            }
            CalibrationError::InvalidConfigValueError { .. } => {
                "Correct the highlighted value and submit again"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CalibrationError>;
