use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Publish failed with status {status}: {message}")]
    PublishError { status: u16, message: String },

    #[error("Processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Network,
    Configuration,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BotError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BotError::Io(_) => ErrorCategory::Io,
            BotError::ApiError(_) | BotError::PublishError { .. } => ErrorCategory::Network,
            BotError::ConfigError { .. }
            | BotError::MissingConfigError { .. }
            | BotError::InvalidConfigValueError { .. }
            | BotError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            BotError::SerializationError(_) | BotError::ProcessingError { .. } => {
                ErrorCategory::Data
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // a rerun on the next schedule may succeed
            BotError::ApiError(_) | BotError::PublishError { .. } => ErrorSeverity::Medium,
            BotError::ConfigError { .. }
            | BotError::MissingConfigError { .. }
            | BotError::InvalidConfigValueError { .. }
            | BotError::ConfigValidationError { .. }
            | BotError::SerializationError(_)
            | BotError::ProcessingError { .. } => ErrorSeverity::High,
            BotError::Io(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            BotError::Io(_) => {
                "Check that the calendar file exists, is readable and is UTF-8 encoded".to_string()
            }
            BotError::ApiError(_) => {
                "Check network connectivity and the Bluesky service URL".to_string()
            }
            BotError::PublishError { status, .. } if *status == 401 => {
                "Verify BLUESKY_HANDLE and BLUESKY_APP_PASSWORD".to_string()
            }
            BotError::PublishError { .. } => {
                "The service rejected the post; retry on the next scheduled run".to_string()
            }
            BotError::MissingConfigError { field } => {
                format!("Provide '{}' via the CLI, the TOML config or the environment", field)
            }
            BotError::InvalidConfigValueError { field, .. }
            | BotError::ConfigValidationError { field, .. } => {
                format!("Fix the value of '{}' and run again", field)
            }
            BotError::ConfigError { .. } => "Review the configuration file".to_string(),
            BotError::SerializationError(_) | BotError::ProcessingError { .. } => {
                "Run again with --verbose for details".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Io => format!("Could not read the calendar: {}", self),
            ErrorCategory::Network => format!("Could not publish to Bluesky: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Data => format!("Unexpected data: {}", self),
        }
    }

    /// Process exit code for this error when it ends a run.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, BotError>;
