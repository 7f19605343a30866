//! Client error types

use thiserror::Error;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Rejected client-side before any network call
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Login attempt refused (bad credentials, expired OTP, refused envelope)
    #[error("Authentication failed: {0}")]
    AuthChallenge(String),

    /// Bearer token no longer accepted by the server
    #[error("Session expired: {0}")]
    SessionExpired(String),

    /// Forbidden
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Server returned an error status
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Create error from an HTTP status on a public (login-protocol) endpoint
    pub fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        match status.as_u16() {
            400 | 401 => Self::AuthChallenge(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            _ => Self::Server {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Create error from an HTTP status on an authenticated endpoint, where
    /// 401 means the bearer token was rejected rather than a failed login
    pub fn from_authenticated_status(status: reqwest::StatusCode, message: String) -> Self {
        match status.as_u16() {
            401 => Self::SessionExpired(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            _ => Self::Server {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Whether this error means the current session must be torn down
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired(_))
    }

    /// User-facing rendering of each error class
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            Self::Validation(msg) | Self::AuthChallenge(msg) => msg.clone(),
            Self::SessionExpired(_) => {
                "Your session has expired. Please sign in again.".to_string()
            }
            Self::Forbidden(_) => "You do not have permission to do that.".to_string(),
            Self::NotFound(_) => "The requested resource was not found.".to_string(),
            Self::Server { .. } => {
                "Something went wrong on the server. Please try again.".to_string()
            }
            Self::Serialization(_) => {
                "Received an unexpected response from the server.".to_string()
            }
            Self::Configuration(msg) => msg.clone(),
        }
    }
}
