use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV rendering error: {0}")]
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

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("No valid schedule found: {message}")]
    SolverError { message: String },

    #[error("Roster processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Solver,
    Output,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RosterError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RosterError::ConfigError { .. }
            | RosterError::ConfigValidationError { .. }
            | RosterError::InvalidConfigValueError { .. }
            | RosterError::MissingConfigError { .. } => ErrorCategory::Configuration,
            RosterError::SolverError { .. } => ErrorCategory::Solver,
            RosterError::ZipError(_)
            | RosterError::CsvError(_)
            | RosterError::SerializationError(_) => ErrorCategory::Output,
            RosterError::IoError(_) | RosterError::ProcessingError { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Solver => ErrorSeverity::Medium,
            ErrorCategory::Output => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            RosterError::ConfigError { .. }
            | RosterError::ConfigValidationError { .. }
            | RosterError::InvalidConfigValueError { .. }
            | RosterError::MissingConfigError { .. } => {
                "Check the configuration file or CLI flags and fix the reported field".to_string()
            }
            RosterError::SolverError { .. } => {
                "Relax the constraints (fewer holidays, lower quota, higher max-consecutive) or rerun with a different seed"
                    .to_string()
            }
            RosterError::ZipError(_) => {
                "Check free disk space and output path permissions".to_string()
            }
            RosterError::CsvError(_) | RosterError::SerializationError(_) => {
                "Inspect the schedule content for unsupported characters".to_string()
            }
            RosterError::IoError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            RosterError::ProcessingError { .. } => {
                "Rerun with --verbose and inspect the logs".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RosterError::SolverError { message } => {
                format!("No valid schedule found: {}", message)
            }
            RosterError::InvalidConfigValueError {
                field,
                value,
                reason,
            } => {
                format!("'{}' is not a valid value for {}: {}", value, field, reason)
            }
            RosterError::MissingConfigError { field } => {
                format!("The configuration field '{}' is required", field)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;
