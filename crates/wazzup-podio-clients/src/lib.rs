//! # Wazzup-Podio Clients
//!
//! HTTP clients for the two platforms the relay connects:
//!
//! - [`PodioClient`] creates and updates items in a Podio app and implements
//!   [`wazzup_podio_core::RecordStore`]
//! - [`WazzupClient`] sends chat messages and manages webhook registration,
//!   and implements [`wazzup_podio_core::MessageSender`]
//!
//! Both clients share one `reqwest::Client` each, built with a bounded
//! request timeout. Nothing is retried; every failure is logged and returned
//! as an [`ApiError`].

pub mod error;
pub mod podio;
pub mod wazzup;

pub use error::{ApiError, AuthError};
pub use podio::{PodioClient, PodioConfig};
pub use wazzup::{WazzupClient, WazzupConfig, WebhookSubscriptions};

use serde_json::Value;
use std::time::Duration;

/// Default timeout for outbound HTTP requests
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// User agent sent with every outbound request
pub const USER_AGENT: &str = concat!("wazzup-podio-relay/", env!("CARGO_PKG_VERSION"));

pub(crate) fn build_http_client(timeout: Duration) -> Result<reqwest::Client, ApiError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| ApiError::Configuration {
            message: format!("Failed to build HTTP client: {}", e),
        })
}

/// Check that a configured base URL is an absolute http(s) URL.
pub fn validate_base_url(field: &str, value: &str) -> Result<(), ApiError> {
    let parsed = url::Url::parse(value).map_err(|e| ApiError::Configuration {
        message: format!("{} is not a valid URL: {}", field, e),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ApiError::Configuration {
            message: format!("{} must use http or https, got '{}'", field, other),
        }),
    }
}

/// Turn a response into JSON, mapping non-2xx statuses to errors.
///
/// An empty success body is returned as `Value::Null`.
pub(crate) async fn read_json(response: reqwest::Response) -> Result<Value, ApiError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(ApiError::HttpError {
            status: status.as_u16(),
            message: if body.is_empty() {
                status.canonical_reason().unwrap_or("Unknown").to_string()
            } else {
                body
            },
        });
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&body).map_err(|e| ApiError::InvalidResponse {
        message: format!("Response is not valid JSON: {}", e),
    })
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
