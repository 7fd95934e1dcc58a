use crate::core::game::GuessRejection;
use crate::core::symptoms::SymptomRejection;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("{endpoint} responded with status {status}")]
    HttpStatusError { endpoint: String, status: u16 },

    #[error("{endpoint} reported failure: {message}")]
    ServiceError { endpoint: String, message: String },

    #[error("Timed out after {seconds}s waiting for {what}")]
    TimeoutError { what: String, seconds: u64 },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Symptom rejected: {0}")]
    SymptomRejected(#[from] SymptomRejection),

    #[error("Guess rejected: {0}")]
    GuessRejected(#[from] GuessRejection),

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

    #[error("Missing required configuration '{field}'")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 使用者輸入在送出請求前就被拒絕
    Input,
    Network,
    /// 服務回應 `success: false`
    Service,
    Data,
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

impl AppError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::SymptomRejected(_) | AppError::GuessRejected(_) => ErrorCategory::Input,
            AppError::HttpError(_) | AppError::HttpStatusError { .. } | AppError::TimeoutError { .. } => {
                ErrorCategory::Network
            }
            AppError::ServiceError { .. } => ErrorCategory::Service,
            AppError::CsvError(_) | AppError::SerializationError(_) => ErrorCategory::Data,
            AppError::UrlError(_)
            | AppError::ConfigError { .. }
            | AppError::ConfigValidationError { .. }
            | AppError::InvalidConfigValueError { .. }
            | AppError::MissingConfigError { .. } => ErrorCategory::Configuration,
            AppError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Service => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 網路或服務端失敗可以由使用者再次操作重試
    pub fn is_retryable(&self) -> bool {
        self.severity() == ErrorSeverity::Medium
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AppError::SymptomRejected(SymptomRejection::LimitReached { .. }) => {
                "Remove a symptom before adding another one"
            }
            AppError::SymptomRejected(SymptomRejection::NothingSelected) => {
                "Add at least one symptom before submitting"
            }
            AppError::SymptomRejected(_) => "Pick a different symptom from the search results",
            AppError::GuessRejected(GuessRejection::Empty) => "Type an author name before guessing",
            AppError::GuessRejected(_) => "Start a new game to keep playing",
            AppError::HttpError(_) | AppError::TimeoutError { .. } => {
                "Check that the service is reachable and try again"
            }
            AppError::HttpStatusError { .. } | AppError::ServiceError { .. } => {
                "The service could not handle the request; try again later"
            }
            AppError::CsvError(_) => "Check that the catalog CSV has a header row",
            AppError::SerializationError(_) => "The service returned an unexpected payload",
            AppError::IoError(_) => "Check file paths and permissions",
            AppError::UrlError(_)
            | AppError::ConfigError { .. }
            | AppError::ConfigValidationError { .. }
            | AppError::InvalidConfigValueError { .. }
            | AppError::MissingConfigError { .. } => "Fix the configuration file or command line flags",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AppError::SymptomRejected(r) => r.to_string(),
            AppError::GuessRejected(r) => r.to_string(),
            AppError::HttpError(e) if e.is_timeout() => "The request timed out".to_string(),
            AppError::HttpError(e) if e.is_connect() => "Could not connect to the service".to_string(),
            AppError::HttpError(_) => "A network error occurred".to_string(),
            AppError::HttpStatusError { status, .. } => {
                format!("The service answered with HTTP {}", status)
            }
            AppError::ServiceError { message, .. } => message.clone(),
            AppError::TimeoutError { what, seconds } => {
                format!("Gave up on {} after {} seconds", what, seconds)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
