use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalcError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid input for '{field}': {reason}")]
    InvalidInputError { field: String, reason: String },

    #[error("Resource not available: {path} ({source})")]
    MissingResourceError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Erlang-B table error: {message}")]
    TableFormatError { message: String },

    #[error("Explanation service error: {message}")]
    ExternalServiceError { message: String },

    #[error("Unknown calculation scenario: {0}")]
    UnknownScenarioError(String),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Resource,
    External,
    Configuration,
    Internal,
}

impl CalcError {
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInputError {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CalcError::InvalidInputError { .. } | CalcError::UnknownScenarioError(_) => {
                ErrorCategory::Input
            }
            CalcError::MissingResourceError { .. }
            | CalcError::TableFormatError { .. }
            | CalcError::CsvError(_)
            | CalcError::IoError(_) => ErrorCategory::Resource,
            CalcError::ApiError(_) | CalcError::ExternalServiceError { .. } => {
                ErrorCategory::External
            }
            CalcError::ConfigError { .. }
            | CalcError::MissingConfigError { .. }
            | CalcError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            CalcError::SerializationError(_) => ErrorCategory::Internal,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("The request could not be calculated: {}", self),
            ErrorCategory::Resource => {
                format!("A required data file could not be read: {}", self)
            }
            ErrorCategory::External => format!("The explanation service failed: {}", self),
            ErrorCategory::Configuration => format!("The configuration is invalid: {}", self),
            ErrorCategory::Internal => format!("Unexpected internal error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_message() {
        let err = CalcError::invalid_input("block_size", "must not be zero");
        assert_eq!(
            err.to_string(),
            "Invalid input for 'block_size': must not be zero"
        );
        assert_eq!(err.category(), ErrorCategory::Input);
    }

    #[test]
    fn test_missing_resource_category() {
        let err = CalcError::MissingResourceError {
            path: "table.csv".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.category(), ErrorCategory::Resource);
        assert!(err.user_friendly_message().contains("table.csv"));
    }
}
