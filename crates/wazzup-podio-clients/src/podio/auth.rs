//! Podio app-grant authentication.
//!
//! The relay authenticates as a single Podio app using the `app` grant. The
//! resulting token is cached by [`PodioClient`](super::PodioClient) until it
//! expires.

use super::PodioConfig;
use crate::error::AuthError;
use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;
use tracing::{error, info, instrument};
use zeroize::Zeroizing;

/// Token lifetime assumed when Podio omits `expires_in`
pub const DEFAULT_TOKEN_LIFETIME_SECONDS: i64 = 3600;

/// A Podio OAuth2 access token with its expiry.
#[derive(Clone)]
pub struct AccessToken {
    token: Zeroizing<String>,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Create a token that expires `expires_in` seconds from now.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidTokenResponse`] when the lifetime does not
    /// fit in a timestamp.
    pub fn new(token: impl Into<String>, expires_in: i64) -> Result<Self, AuthError> {
        let expires_at = TimeDelta::try_seconds(expires_in)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .ok_or_else(|| AuthError::InvalidTokenResponse {
                message: format!("expires_in {} is out of range", expires_in),
            })?;

        Ok(Self {
            token: Zeroizing::new(token.into()),
            expires_at,
        })
    }

    /// Get the token string for the `Authorization: OAuth2 <token>` header.
    pub fn secret(&self) -> &str {
        self.token.as_str()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("expires_at", &self.expires_at)
            .field("token", &"<REDACTED>")
            .finish()
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
}

/// Check that every app-grant credential is present.
///
/// # Errors
///
/// Returns [`AuthError::MissingCredentials`] naming every empty credential.
pub fn check_credentials(config: &PodioConfig) -> Result<(), AuthError> {
    let missing: Vec<&str> = [
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
        ("app_id", config.app_id.as_str()),
        ("app_token", config.app_token.as_str()),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(name, _)| name)
    .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AuthError::MissingCredentials {
            missing: missing.join(", "),
        })
    }
}

/// Exchange the app credentials for an access token.
///
/// # Errors
///
/// - [`AuthError::MissingCredentials`] without making a request
/// - [`AuthError::TokenRejected`] for non-2xx responses
/// - [`AuthError::InvalidTokenResponse`] when the body has no token
/// - [`AuthError::NetworkError`] for transport failures
#[instrument(skip(http, config), fields(app_id = %config.app_id))]
pub async fn request_app_token(
    http: &reqwest::Client,
    config: &PodioConfig,
) -> Result<AccessToken, AuthError> {
    check_credentials(config)?;

    let url = format!("{}/oauth/token", config.api_url.trim_end_matches('/'));
    let form = [
        ("grant_type", "app"),
        ("app_id", config.app_id.as_str()),
        ("app_token", config.app_token.as_str()),
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
    ];

    let response = http
        .post(&url)
        .form(&form)
        .send()
        .await
        .map_err(|e| AuthError::NetworkError(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error body".to_string());
        error!(status = status.as_u16(), "Podio rejected the token request");
        return Err(AuthError::TokenRejected {
            status: status.as_u16(),
            message,
        });
    }

    let body: TokenResponse =
        response
            .json()
            .await
            .map_err(|e| AuthError::InvalidTokenResponse {
                message: e.to_string(),
            })?;

    if body.access_token.is_empty() {
        return Err(AuthError::InvalidTokenResponse {
            message: "access_token is empty".to_string(),
        });
    }

    let token = AccessToken::new(
        body.access_token,
        body.expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECONDS),
    )?;
    info!(expires_at = %token.expires_at(), "Authenticated with Podio");

    Ok(token)
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
