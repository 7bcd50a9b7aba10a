use thiserror::Error;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Failed to start price lookup: {message}")]
    SubmissionError { message: String },

    #[error("Polling failed: {message}")]
    PollTransportError { message: String },

    #[error("Price lookup job failed: {message}")]
    BackendJobError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Network,
    Backend,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LookupError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn submission(message: impl Into<String>) -> Self {
        Self::SubmissionError {
            message: message.into(),
        }
    }

    pub fn poll_transport(message: impl Into<String>) -> Self {
        Self::PollTransportError {
            message: message.into(),
        }
    }

    pub fn backend_job(message: impl Into<String>) -> Self {
        Self::BackendJobError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError { .. } => ErrorCategory::Input,
            Self::SubmissionError { .. } | Self::PollTransportError { .. } | Self::HttpError(_) => {
                ErrorCategory::Network
            }
            Self::BackendJobError { .. } => ErrorCategory::Backend,
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::CsvError(_) | Self::IoError(_) | Self::SerializationError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Backend => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的單行訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ValidationError { message } => message.clone(),
            Self::SubmissionError { .. } => "Failed to start price lookup. Try again.".to_string(),
            Self::PollTransportError { .. } => "Lost contact with the price lookup job.".to_string(),
            Self::BackendJobError { .. } => "Price lookup failed.".to_string(),
            Self::ConfigValidationError { field, .. }
            | Self::InvalidConfigValueError { field, .. }
            | Self::MissingConfigError { field } => {
                format!("Configuration problem with '{}': {}", field, self)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Select at least one vehicle and run the lookup again",
            ErrorCategory::Network => "Check that the backend is reachable at the configured base URL",
            ErrorCategory::Backend => "Inspect the backend worker logs, then resubmit the job",
            ErrorCategory::Configuration => "Fix the configuration value and restart",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, LookupError>;
