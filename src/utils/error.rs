use thiserror::Error;

/// 未授權時導向的登入頁
pub const LOGIN_PATH: &str = "/login";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Session expired or invalid, redirecting to {redirect_to}")]
    UnauthorizedError { redirect_to: String },

    #[error("Access denied: {message}")]
    ForbiddenError { message: String },

    #[error("Not found: {message}")]
    NotFoundError { message: String },

    #[error("Request failed with status {status}: {message}")]
    StatusError { status: u16, message: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required field: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error on '{field}': {message}")]
    ValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Auth,
    Client,
    Server,
    Configuration,
    Validation,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ClientError {
    /// 依 HTTP 狀態碼分派錯誤類型
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 => ClientError::UnauthorizedError {
                redirect_to: LOGIN_PATH.to_string(),
            },
            403 => ClientError::ForbiddenError { message },
            404 => ClientError::NotFoundError { message },
            _ => ClientError::StatusError { status, message },
        }
    }

    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        ClientError::ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::UnauthorizedError { .. } => Some(401),
            ClientError::ForbiddenError { .. } => Some(403),
            ClientError::NotFoundError { .. } => Some(404),
            ClientError::StatusError { status, .. } => Some(*status),
            ClientError::NetworkError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::NetworkError(e) if e.status().is_none())
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::UnauthorizedError { .. })
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ClientError::NetworkError(_) => ErrorCategory::Network,
            ClientError::UnauthorizedError { .. } | ClientError::ForbiddenError { .. } => {
                ErrorCategory::Auth
            }
            ClientError::NotFoundError { .. } => ErrorCategory::Client,
            ClientError::StatusError { status, .. } if *status >= 500 => ErrorCategory::Server,
            ClientError::StatusError { .. } => ErrorCategory::Client,
            ClientError::SerializationError(_) | ClientError::IoError(_) => ErrorCategory::Data,
            ClientError::UrlError(_)
            | ClientError::ConfigError { .. }
            | ClientError::InvalidConfigValueError { .. }
            | ClientError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ClientError::ValidationError { .. } => ErrorCategory::Validation,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::Client => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Server => ErrorSeverity::Medium,
            ErrorCategory::Auth | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的訊息（toast 與 CLI 共用）
    pub fn user_friendly_message(&self) -> String {
        match self {
            ClientError::NetworkError(_) => {
                "Could not reach the server. Check your connection.".to_string()
            }
            ClientError::UnauthorizedError { .. } => {
                "Your session has expired. Please log in again.".to_string()
            }
            ClientError::ForbiddenError { message } => {
                format!("You are not allowed to do that: {}", message)
            }
            ClientError::NotFoundError { message } => format!("Not found: {}", message),
            ClientError::StatusError { message, .. } => message.clone(),
            ClientError::ValidationError { field, message } => format!("{}: {}", field, message),
            ClientError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            ClientError::MissingConfigError { field } => {
                format!("Missing setting '{}'", field)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Verify the API base URL and that the server is running",
            ErrorCategory::Auth => "Log in again with an account that has access",
            ErrorCategory::Client => "Check the identifiers and parameters you passed",
            ErrorCategory::Server => "The server failed; try again later",
            ErrorCategory::Configuration => "Fix the configuration file or command-line flags",
            ErrorCategory::Validation => "Correct the highlighted field and resubmit",
            ErrorCategory::Data => "Check local files and the server response format",
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
