use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request timed out. Please check your connection.")]
    Timeout,

    #[error("Unable to connect to server. Please check if the server is running.")]
    NetworkUnavailable,

    #[error("{message}")]
    HttpStatus { code: u16, message: String },

    #[error("{message}")]
    Validation { fields: Vec<String>, message: String },

    #[error("Unexpected response body: {message}")]
    Decode { message: String },

    #[error("Configuration error: {field}: {reason}")]
    Config { field: String, reason: String },

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<ApiError>,
    },
}

/// Error kind with domain prefixes stripped, for programmatic inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    Timeout,
    NetworkUnavailable,
    HttpStatus(u16),
    Validation,
    Decode,
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Server,
    Client,
    Input,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ApiError {
    pub fn validation(fields: Vec<String>, message: impl Into<String>) -> Self {
        ApiError::Validation {
            fields,
            message: message.into(),
        }
    }

    pub fn config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ApiError::Config {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// 加上領域前綴，保留原本的錯誤種類
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ApiError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping any context layers.
    pub fn root(&self) -> &ApiError {
        match self {
            ApiError::Context { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Timeout => ErrorKind::Timeout,
            ApiError::NetworkUnavailable => ErrorKind::NetworkUnavailable,
            ApiError::HttpStatus { code, .. } => ErrorKind::HttpStatus(*code),
            ApiError::Validation { .. } => ErrorKind::Validation,
            ApiError::Decode { .. } => ErrorKind::Decode,
            ApiError::Config { .. } => ErrorKind::Config,
            ApiError::Context { source, .. } => source.kind(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self.kind() {
            ErrorKind::HttpStatus(code) => Some(code),
            _ => None,
        }
    }

    /// Fields named by a validation failure; empty for every other kind.
    pub fn invalid_fields(&self) -> &[String] {
        match self.root() {
            ApiError::Validation { fields, .. } => fields,
            _ => &[],
        }
    }

    /// Timeouts, connection failures, 5xx, 408 and 429 may succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        match self.kind() {
            ErrorKind::Timeout | ErrorKind::NetworkUnavailable => true,
            ErrorKind::HttpStatus(code) => code >= 500 || code == 408 || code == 429,
            ErrorKind::Validation | ErrorKind::Decode | ErrorKind::Config => false,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self.kind() {
            ErrorKind::Timeout | ErrorKind::NetworkUnavailable => ErrorCategory::Network,
            ErrorKind::HttpStatus(code) if code >= 500 => ErrorCategory::Server,
            ErrorKind::HttpStatus(_) | ErrorKind::Decode => ErrorCategory::Client,
            ErrorKind::Validation => ErrorCategory::Input,
            ErrorKind::Config => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Server => ErrorSeverity::Medium,
            ErrorCategory::Client => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.root() {
            ApiError::Validation { message, .. } => message.clone(),
            ApiError::Config { field, reason } => {
                format!("Invalid configuration for '{}': {}", field, reason)
            }
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Timeout => "The server may be waking up; try again in a few seconds",
            ErrorKind::NetworkUnavailable => "Check your internet connection and the --base-url setting",
            ErrorKind::HttpStatus(404) => "The endpoint was not found; check the API base URL",
            ErrorKind::HttpStatus(code) if code >= 500 => "The server reported an error; retry later or pass --retry",
            ErrorKind::HttpStatus(_) => "The server rejected the request; check the submitted values",
            ErrorKind::Validation => "Fill in the missing or invalid fields and submit again",
            ErrorKind::Decode => "The server answered with an unexpected payload; check the API version",
            ErrorKind::Config => "Fix the configuration file or command line flags",
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
