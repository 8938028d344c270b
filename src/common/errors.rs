//! Error types for the client

use thiserror::Error;

/// Result type alias using our AcisError
pub type Result<T> = std::result::Result<T, AcisError>;

/// Main error type for client operations
#[derive(Error, Debug)]
pub enum AcisError {
    /// Missing or rejected API key
    #[error("Authentication error: {message}")]
    Authentication {
        message: String,
        status_code: Option<u16>,
        response: Option<serde_json::Value>,
    },

    /// Daily request quota exhausted
    #[error("Rate limit exceeded: {message}, resets at {reset_at:?}")]
    RateLimit {
        message: String,
        /// Reset time exactly as reported by the server
        reset_at: Option<String>,
        response: Option<serde_json::Value>,
    },

    /// Invalid request parameters, raised locally or by the server (400/422)
    #[error("Validation error{}: {message}", field_suffix(.field))]
    Validation {
        field: Option<String>,
        message: String,
        /// `None` when the request was rejected before being sent
        status_code: Option<u16>,
        response: Option<serde_json::Value>,
    },

    /// Any other non-success HTTP status
    #[error("API error ({status_code}): {message}")]
    Api {
        status_code: u16,
        message: String,
        response: Option<serde_json::Value>,
    },

    /// Network-level failures (timeout, DNS, connection refused)
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Successful status with a body that does not match the expected shape
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

fn field_suffix(field: &Option<String>) -> String {
    field
        .as_ref()
        .map(|f| format!(" on `{}`", f))
        .unwrap_or_default()
}

impl AcisError {
    /// Build a validation error for a request rejected before sending
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        AcisError::Validation {
            field: Some(field.to_string()),
            message: message.into(),
            status_code: None,
            response: None,
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            AcisError::Authentication { status_code, .. } => *status_code,
            AcisError::RateLimit { .. } => Some(429),
            AcisError::Validation { status_code, .. } => *status_code,
            AcisError::Api { status_code, .. } => Some(*status_code),
            AcisError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Reset time of a rate limit error
    pub fn reset_at(&self) -> Option<&str> {
        match self {
            AcisError::RateLimit { reset_at, .. } => reset_at.as_deref(),
            _ => None,
        }
    }

    /// Raw decoded error body returned by the server
    pub fn response(&self) -> Option<&serde_json::Value> {
        match self {
            AcisError::Authentication { response, .. }
            | AcisError::RateLimit { response, .. }
            | AcisError::Validation { response, .. }
            | AcisError::Api { response, .. } => response.as_ref(),
            _ => None,
        }
    }

    /// Whether the same request could succeed later.
    ///
    /// Advisory only: the client itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            AcisError::RateLimit { .. } | AcisError::Transport(_) => true,
            AcisError::Api { status_code, .. } => *status_code >= 500,
            _ => false,
        }
    }
}
