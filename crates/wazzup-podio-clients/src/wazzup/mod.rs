//! Wazzup REST API client.
//!
//! Used on the reverse path to deliver Podio comments as chat messages, and
//! by the CLI to inspect channels and register the relay's webhook URL.

use crate::{build_http_client, read_json, validate_base_url, ApiError, DEFAULT_TIMEOUT_SECONDS};
use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{error, info, instrument};
use wazzup_podio_core::{normalize_chat_id, MessageSender, OutboundError};

/// Wazzup connection settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WazzupConfig {
    /// REST API base URL
    pub api_url: String,

    #[serde(skip_serializing)]
    pub api_key: String,

    /// Channel outbound messages are sent from
    pub channel_id: String,

    /// Messenger used for outbound messages
    pub chat_type: String,

    /// Shared secret for inbound webhook signatures; empty disables validation
    #[serde(skip_serializing)]
    pub webhook_secret: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for WazzupConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.wazzup24.com/v3".to_string(),
            api_key: String::new(),
            channel_id: String::new(),
            chat_type: "whatsapp".to_string(),
            webhook_secret: String::new(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl WazzupConfig {
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_channel_id(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = channel_id.into();
        self
    }

    pub fn with_webhook_secret(mut self, secret: impl Into<String>) -> Self {
        self.webhook_secret = secret.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_seconds = timeout.as_secs();
        self
    }
}

impl std::fmt::Debug for WazzupConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WazzupConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"<REDACTED>")
            .field("channel_id", &self.channel_id)
            .field("chat_type", &self.chat_type)
            .field("webhook_secret", &"<REDACTED>")
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Webhook kinds Wazzup should deliver to the relay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookSubscriptions {
    pub messages_and_statuses: bool,
    pub contacts_and_deals_creation: bool,
    pub channels_updates: bool,
}

impl Default for WebhookSubscriptions {
    fn default() -> Self {
        Self {
            messages_and_statuses: true,
            contacts_and_deals_creation: false,
            channels_updates: false,
        }
    }
}

// ============================================================================
// Client
// ============================================================================

/// Wazzup API client authenticated with an API key.
///
/// Construction never fails on missing settings: the relay must still be
/// able to receive webhooks without outbound messaging configured. Calls
/// made without an API key return [`ApiError::Configuration`].
#[derive(Clone)]
pub struct WazzupClient {
    http: reqwest::Client,
    config: WazzupConfig,
}

impl WazzupClient {
    pub fn new(config: WazzupConfig) -> Result<Self, ApiError> {
        validate_base_url("wazzup.api_url", &config.api_url)?;
        let http = build_http_client(Duration::from_secs(config.timeout_seconds))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &WazzupConfig {
        &self.config
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        if self.config.api_key.trim().is_empty() {
            return Err(ApiError::Configuration {
                message: "Wazzup API key is not configured".to_string(),
            });
        }

        let url = format!("{}{}", self.config.api_url.trim_end_matches('/'), path);
        let mut request = self
            .http
            .request(method.clone(), &url)
            .bearer_auth(&self.config.api_key);
        if let Some(body) = body {
            request = request.json(body);
        }

        let result = match request.send().await {
            Ok(response) => read_json(response).await,
            Err(e) => Err(ApiError::from(e)),
        };

        if let Err(e) = &result {
            error!(method = %method, path = %path, error = %e, "Wazzup API request failed");
        }
        result
    }

    /// Send a text message from the configured channel.
    ///
    /// The chat id is normalized to its `@c.us` form first.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn send_text(&self, chat_id: &str, text: &str) -> Result<Value, ApiError> {
        if self.config.channel_id.trim().is_empty() {
            return Err(ApiError::Configuration {
                message: "Wazzup channel id is not configured".to_string(),
            });
        }

        let chat_id = normalize_chat_id(chat_id);
        let body = json!({
            "channelId": self.config.channel_id,
            "chatId": chat_id,
            "chatType": self.config.chat_type,
            "text": text,
        });

        let result = self.request(Method::POST, "/message", Some(&body)).await?;
        let message_id = result
            .get("messageId")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("unknown");
        info!(
            chat_id = %chat_id,
            message_id = %message_id,
            "Message sent"
        );
        Ok(result)
    }

    /// List the channels connected to the account.
    #[instrument(skip(self))]
    pub async fn list_channels(&self) -> Result<Vec<Value>, ApiError> {
        let response = self.request(Method::GET, "/channels", None).await?;
        match response {
            Value::Array(channels) => Ok(channels),
            Value::Null => Ok(Vec::new()),
            _ => Err(ApiError::InvalidResponse {
                message: "channel list is not an array".to_string(),
            }),
        }
    }

    /// The configured channel, or the first channel when it is not listed.
    pub async fn channel_info(&self) -> Result<Option<Value>, ApiError> {
        let mut channels = self.list_channels().await?;

        let configured = channels.iter().position(|channel| {
            channel.get("channelId").and_then(Value::as_str) == Some(self.config.channel_id.as_str())
        });

        Ok(match configured {
            Some(index) => Some(channels.swap_remove(index)),
            None => channels.into_iter().next(),
        })
    }

    /// Current webhook registration.
    #[instrument(skip(self))]
    pub async fn webhook_settings(&self) -> Result<Value, ApiError> {
        self.request(Method::GET, "/webhooks", None).await
    }

    /// Register `url` as the webhook endpoint.
    #[instrument(skip(self))]
    pub async fn configure_webhook(
        &self,
        url: &str,
        subscriptions: WebhookSubscriptions,
    ) -> Result<Value, ApiError> {
        let body = json!({
            "webhooksUrl": url,
            "subscriptions": subscriptions,
        });

        let result = self.request(Method::PATCH, "/webhooks", Some(&body)).await?;
        info!(url = %url, "Wazzup webhook configured");
        Ok(result)
    }
}

impl std::fmt::Debug for WazzupClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WazzupClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl MessageSender for WazzupClient {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<Value, OutboundError> {
        Ok(self.send_text(chat_id, text).await?)
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
