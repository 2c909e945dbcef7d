//! Error types for the Podio and Wazzup clients.

use thiserror::Error;
use wazzup_podio_core::OutboundError;

/// Failures obtaining a Podio access token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// One or more app-grant credentials are empty (no request is made).
    #[error("Podio credentials are not configured: missing {missing}")]
    MissingCredentials { missing: String },

    /// Podio rejected the token request.
    #[error("Token request rejected: {status} - {message}")]
    TokenRejected { status: u16, message: String },

    /// The token endpoint answered 2xx with an unusable body.
    #[error("Invalid token response: {message}")]
    InvalidTokenResponse { message: String },

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Errors from calls to the Podio or Wazzup REST APIs
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// Non-2xx response; `message` carries the response body.
    #[error("HTTP error: {status} - {message}")]
    HttpError { status: u16, message: String },

    #[error("Request timeout")]
    Timeout,

    /// Connection, TLS or body-read failure
    #[error("HTTP client error: {message}")]
    Transport { message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    /// The client cannot make the call as configured.
    #[error("Client configuration error: {message}")]
    Configuration { message: String },
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport {
                message: e.to_string(),
            }
        }
    }
}

impl From<ApiError> for OutboundError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Auth(AuthError::MissingCredentials { missing }) => {
                OutboundError::NotConfigured {
                    message: format!("missing {}", missing),
                }
            }
            ApiError::Auth(auth) => OutboundError::Authentication {
                message: auth.to_string(),
            },
            ApiError::HttpError { status, message } => OutboundError::Upstream { status, message },
            ApiError::Timeout => OutboundError::Transport {
                message: "request timed out".to_string(),
            },
            ApiError::Transport { message } => OutboundError::Transport { message },
            ApiError::InvalidResponse { message } => OutboundError::InvalidResponse { message },
            ApiError::Configuration { message } => OutboundError::NotConfigured { message },
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
