//! Podio REST API client.
//!
//! Creates one Podio item per relayed record and attaches the formatted
//! record as a comment. See [`PodioClient`].

mod auth;

pub use auth::{check_credentials, request_app_token, AccessToken, DEFAULT_TOKEN_LIFETIME_SECONDS};

use crate::{build_http_client, read_json, validate_base_url, ApiError, DEFAULT_TIMEOUT_SECONDS};
use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};
use wazzup_podio_core::format::format_record;
use wazzup_podio_core::{CanonicalRecord, CreatedItem, ItemFields, OutboundError, RecordStore};

// ============================================================================
// Configuration
// ============================================================================

/// Podio connection settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PodioConfig {
    /// REST API base URL
    pub api_url: String,

    /// Web UI base URL, used to build item links
    pub web_url: String,

    pub client_id: String,

    #[serde(skip_serializing)]
    pub client_secret: String,

    /// App the relay writes items to
    pub app_id: String,

    #[serde(skip_serializing)]
    pub app_token: String,

    /// Workspace the app lives in (informational)
    pub space_id: Option<String>,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for PodioConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.podio.com".to_string(),
            web_url: "https://podio.com".to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            app_id: String::new(),
            app_token: String::new(),
            space_id: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl PodioConfig {
    /// Set the app-grant credentials.
    pub fn with_credentials(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        app_id: impl Into<String>,
        app_token: impl Into<String>,
    ) -> Self {
        self.client_id = client_id.into();
        self.client_secret = client_secret.into();
        self.app_id = app_id.into();
        self.app_token = app_token.into();
        self
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_web_url(mut self, url: impl Into<String>) -> Self {
        self.web_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_seconds = timeout.as_secs();
        self
    }

    /// Whether all app-grant credentials are set
    pub fn is_configured(&self) -> bool {
        check_credentials(self).is_ok()
    }
}

impl std::fmt::Debug for PodioConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PodioConfig")
            .field("api_url", &self.api_url)
            .field("web_url", &self.web_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<REDACTED>")
            .field("app_id", &self.app_id)
            .field("app_token", &"<REDACTED>")
            .field("space_id", &self.space_id)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

// ============================================================================
// Client
// ============================================================================

/// Podio API client authenticated as a single app.
///
/// The access token is cached behind an async mutex. Concurrent requests
/// that find it missing or expired wait for one refresh instead of each
/// requesting their own.
///
/// # Examples
///
/// ```no_run
/// # use wazzup_podio_clients::{PodioClient, PodioConfig};
/// # async fn example() -> Result<(), wazzup_podio_clients::ApiError> {
/// let config = PodioConfig::default()
///     .with_credentials("client", "secret", "123", "app-token");
/// let client = PodioClient::new(config)?;
///
/// let fields = client.get_app_fields().await?;
/// println!("App has {} fields", fields.len());
/// # Ok(())
/// # }
/// ```
pub struct PodioClient {
    http: reqwest::Client,
    config: PodioConfig,
    token: Mutex<Option<AccessToken>>,
}

impl PodioClient {
    /// Create a client. No network calls are made until the first request.
    pub fn new(config: PodioConfig) -> Result<Self, ApiError> {
        validate_base_url("podio.api_url", &config.api_url)?;
        let http = build_http_client(Duration::from_secs(config.timeout_seconds))?;
        Ok(Self {
            http,
            config,
            token: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &PodioConfig {
        &self.config
    }

    /// Web link to an item of the configured app
    pub fn item_url(&self, item_id: u64) -> String {
        format!(
            "{}/app/{}/items/{}",
            self.config.web_url.trim_end_matches('/'),
            self.config.app_id,
            item_id
        )
    }

    /// Return a valid token, authenticating when none is cached or it expired.
    async fn access_token(&self) -> Result<AccessToken, ApiError> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Ok(token.clone());
            }
            info!("Podio token expired, refreshing");
        }

        let token = request_app_token(&self.http, &self.config).await?;
        *cached = Some(token.clone());
        Ok(token)
    }

    /// Make an authenticated request and decode the JSON response.
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let token = self.access_token().await?;
        let url = format!("{}{}", self.config.api_url.trim_end_matches('/'), path);

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header("Authorization", format!("OAuth2 {}", token.secret()));
        if let Some(body) = body {
            request = request.json(body);
        }

        let result = match request.send().await {
            Ok(response) => read_json(response).await,
            Err(e) => Err(ApiError::from(e)),
        };

        if let Err(e) = &result {
            error!(method = %method, path = %path, error = %e, "Podio API request failed");
        }
        result
    }

    // ========================================================================
    // App Operations
    // ========================================================================

    /// Fetch the app definition.
    #[instrument(skip(self), fields(app_id = %self.config.app_id))]
    pub async fn get_app(&self) -> Result<Value, ApiError> {
        self.request(Method::GET, &format!("/app/{}", self.config.app_id), None)
            .await
    }

    /// Fetch the app's field definitions.
    pub async fn get_app_fields(&self) -> Result<Vec<Value>, ApiError> {
        let app = self.get_app().await?;
        Ok(app
            .get("fields")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }

    // ========================================================================
    // Item Operations
    // ========================================================================

    /// Create an item and return its id.
    #[instrument(skip(self, fields), fields(app_id = %self.config.app_id, field_count = fields.len()))]
    pub async fn create_item(&self, fields: &ItemFields) -> Result<u64, ApiError> {
        let body = fields.to_request_body();
        let path = format!("/item/app/{}/", self.config.app_id);
        let response = self.request(Method::POST, &path, Some(&body)).await?;

        let item_id = response
            .get("item_id")
            .and_then(Value::as_u64)
            .ok_or_else(|| ApiError::InvalidResponse {
                message: "create item response has no item_id".to_string(),
            })?;

        info!(item_id, "Created Podio item");
        Ok(item_id)
    }

    /// Add a comment to an item.
    #[instrument(skip(self, text))]
    pub async fn add_comment(
        &self,
        item_id: u64,
        text: &str,
        external_id: &str,
    ) -> Result<Value, ApiError> {
        let body = json!({ "value": text, "external_id": external_id });
        let path = format!("/comment/item/{}/", item_id);
        let result = self.request(Method::POST, &path, Some(&body)).await?;

        debug!(item_id, "Added comment to Podio item");
        Ok(result)
    }

    /// Create an item for a record and attach its formatted comment.
    ///
    /// A failed comment is logged; the item still counts as created.
    pub async fn create_record_item(
        &self,
        record: &CanonicalRecord,
    ) -> Result<CreatedItem, ApiError> {
        let fields = ItemFields::from_record(record);
        let item_id = self.create_item(&fields).await?;

        let comment = format_record(record);
        if let Err(e) = self
            .add_comment(item_id, &comment, record.message_id())
            .await
        {
            warn!(item_id, error = %e, "Item created but the comment could not be added");
        }

        Ok(CreatedItem {
            item_id,
            podio_url: self.item_url(item_id),
        })
    }

    /// Find the first item whose `chat-id` field matches.
    #[instrument(skip(self))]
    pub async fn filter_by_chat_id(&self, chat_id: &str) -> Result<Option<Value>, ApiError> {
        let body = json!({
            "filters": { "chat-id": chat_id },
            "limit": 1
        });
        let path = format!("/item/app/{}/filter/", self.config.app_id);
        let response = self.request(Method::POST, &path, Some(&body)).await?;

        Ok(response
            .get("items")
            .and_then(Value::as_array)
            .and_then(|items| items.first())
            .cloned())
    }

    /// Replace field values on an existing item.
    #[instrument(skip(self, fields))]
    pub async fn update_item_fields(
        &self,
        item_id: u64,
        fields: &ItemFields,
    ) -> Result<Value, ApiError> {
        let body = fields.to_request_body();
        let result = self
            .request(Method::PUT, &format!("/item/{}", item_id), Some(&body))
            .await?;

        info!(item_id, "Updated Podio item");
        Ok(result)
    }
}

impl std::fmt::Debug for PodioClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PodioClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl RecordStore for PodioClient {
    async fn check_connection(&self) -> bool {
        self.get_app().await.is_ok()
    }

    async fn create_message_item(
        &self,
        record: &CanonicalRecord,
    ) -> Result<CreatedItem, OutboundError> {
        Ok(self.create_record_item(record).await?)
    }

    async fn find_item_by_chat_id(&self, chat_id: &str) -> Result<Option<Value>, OutboundError> {
        Ok(self.filter_by_chat_id(chat_id).await?)
    }

    async fn update_item(&self, item_id: u64, fields: ItemFields) -> Result<Value, OutboundError> {
        Ok(self.update_item_fields(item_id, &fields).await?)
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
