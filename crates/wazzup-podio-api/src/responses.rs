//! Request and response bodies for the HTTP API.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use wazzup_podio_core::CreatedItem;

/// Name reported by the index and status endpoints
pub const SERVICE_NAME: &str = "Wazzup-Podio Integration";

// ============================================================================
// Request Types
// ============================================================================

/// Body of `POST /send_message`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub chat_id: Option<String>,

    #[serde(default)]
    pub text: Option<String>,
}

// ============================================================================
// Response Types
// ============================================================================

/// Liveness response for `GET /`
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: String,
}

/// Connection summary for `GET /status`
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub service: String,
    pub status: String,
    pub connections: ConnectionStatus,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct ConnectionStatus {
    /// `connected` or `disconnected`
    pub podio: String,
}

impl ConnectionStatus {
    pub fn from_podio(connected: bool) -> Self {
        Self {
            podio: if connected { "connected" } else { "disconnected" }.to_string(),
        }
    }
}

/// Result of relaying a Wazzup webhook
#[derive(Debug, Serialize)]
pub struct WazzupWebhookResponse {
    pub status: String,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub podio_items: Option<Vec<CreatedItem>>,
}

impl WazzupWebhookResponse {
    pub fn success(items: Vec<CreatedItem>) -> Self {
        Self {
            status: "success".to_string(),
            message: format!("Processed {} items and sent to Podio", items.len()),
            podio_items: Some(items),
        }
    }

    pub fn ignored() -> Self {
        Self {
            status: "ignored".to_string(),
            message: "No processable data in webhook".to_string(),
            podio_items: None,
        }
    }
}

/// Result of handling a Podio webhook
#[derive(Debug, Serialize)]
pub struct PodioWebhookResponse {
    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl PodioWebhookResponse {
    pub fn sent(result: Value) -> Self {
        Self {
            status: "sent".to_string(),
            event_type: Some("comment.create".to_string()),
            result: Some(result),
        }
    }

    pub fn acknowledged(event_type: &str) -> Self {
        Self {
            status: "acknowledged".to_string(),
            event_type: Some(event_type.to_string()),
            result: None,
        }
    }

    pub fn ignored(event_type: Option<&str>) -> Self {
        Self {
            status: "ignored".to_string(),
            event_type: event_type.map(str::to_string),
            result: None,
        }
    }
}

/// Result of `POST /send_message`
#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub status: String,
    pub result: Value,
}

/// Echo returned by `POST /webhook/test`
#[derive(Debug, Serialize)]
pub struct WebhookTestResponse {
    pub status: String,
    pub message: String,
    pub received_data: Value,
    pub timestamp: String,
}
