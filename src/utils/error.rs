use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("GraphQL query '{query}' failed: {message}")]
    GraphqlError { query: String, message: String },

    #[error("GraphQL query '{query}' returned no data")]
    EmptyResponseError { query: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Page scroll is already locked by another menu")]
    ScrollLockHeld,

    #[error("Server error: {message}")]
    ServerError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Content,
    Configuration,
    Storage,
    State,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SiteError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SiteError::ApiError(_) | SiteError::ServerError { .. } => ErrorCategory::Network,
            SiteError::GraphqlError { .. }
            | SiteError::EmptyResponseError { .. }
            | SiteError::SerializationError(_) => ErrorCategory::Content,
            SiteError::TomlError(_)
            | SiteError::ConfigError { .. }
            | SiteError::InvalidConfigValueError { .. }
            | SiteError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SiteError::IoError(_) => ErrorCategory::Storage,
            SiteError::ScrollLockHeld => ErrorCategory::State,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SiteError::ScrollLockHeld => ErrorSeverity::Low,
            SiteError::ApiError(_)
            | SiteError::GraphqlError { .. }
            | SiteError::EmptyResponseError { .. } => ErrorSeverity::Medium,
            SiteError::SerializationError(_)
            | SiteError::TomlError(_)
            | SiteError::ConfigError { .. }
            | SiteError::InvalidConfigValueError { .. }
            | SiteError::MissingConfigError { .. } => ErrorSeverity::High,
            SiteError::IoError(_) | SiteError::ServerError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check that the WordPress GraphQL endpoint is reachable and try again"
            }
            ErrorCategory::Content => {
                "Verify the menu slug and that WPGraphQL exposes the requested fields"
            }
            ErrorCategory::Configuration => "Fix the configuration file or command-line flags",
            ErrorCategory::Storage => "Check that the output directory exists and is writable",
            ErrorCategory::State => "Close the open menu before opening another one",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SiteError::ApiError(_) => "Could not reach the content server".to_string(),
            SiteError::GraphqlError { query, .. } | SiteError::EmptyResponseError { query } => {
                format!("The content server could not answer '{}'", query)
            }
            SiteError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            SiteError::MissingConfigError { field } => {
                format!("Missing setting '{}'", field)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;
