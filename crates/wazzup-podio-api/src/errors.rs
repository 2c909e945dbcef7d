//! Error types for the HTTP service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::{error, warn};
use wazzup_podio_core::{OutboundError, ReplyError, ValidationError};

/// Request handler errors with HTTP status code mapping
///
/// - `400 Bad Request`: empty or malformed bodies, missing fields, comments
///   without a chat id
/// - `401 Unauthorized`: missing or mismatched webhook signature
/// - `404 Not Found`: unknown route
/// - `500 Internal Server Error`: upstream (Podio or Wazzup) failures
///
/// Upstream failure details are logged server-side; clients only receive a
/// generic message.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// Body was empty, whitespace, or an empty JSON value
    #[error("No data provided")]
    EmptyBody,

    /// Body could not be parsed as JSON
    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },

    /// Webhook signature check failed
    #[error("Invalid webhook signature: {0}")]
    InvalidSignature(ValidationError),

    /// Request was well-formed JSON but missing required content
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] ValidationError),

    /// No Podio item could be created for a webhook that produced records
    #[error("Failed to create any Podio items ({failures} failed)")]
    AllItemsFailed { failures: usize },

    /// Forwarding a Podio comment to chat failed
    #[error(transparent)]
    Reply(#[from] ReplyError),

    /// A direct outbound send failed
    #[error("Failed to send message: {0}")]
    Send(#[from] OutboundError),

    #[error("Endpoint not found")]
    NotFound,
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::EmptyBody | Self::InvalidJson { .. } | Self::InvalidRequest(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            Self::InvalidSignature(ref e) => {
                warn!(error = %e, "Rejected webhook with invalid signature");
                (StatusCode::UNAUTHORIZED, "Invalid signature".to_string())
            }
            Self::AllItemsFailed { failures } => {
                error!(failures = failures, "No Podio items were created");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to send any items to Podio".to_string(),
                )
            }
            Self::Reply(ReplyError::NoChatId) => (StatusCode::BAD_REQUEST, self.to_string()),
            Self::Reply(ReplyError::Send(ref e)) | Self::Send(ref e) => {
                error!(error = %e, "Outbound message failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to send message".to_string(),
                )
            }
            Self::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        (status, Json(body)).into_response()
    }
}

/// Service-level errors
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Failed to bind to address {address}: {message}")]
    BindFailed { address: String, message: String },

    #[error("Server failed: {message}")]
    ServerFailed { message: String },

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {key}")]
    Missing { key: String },

    #[error("Failed to load configuration: {message}")]
    Load { message: String },
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;
