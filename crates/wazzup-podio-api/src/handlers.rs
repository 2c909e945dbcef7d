//! Route handlers.

use crate::responses::{
    ConnectionStatus, IndexResponse, PodioWebhookResponse, SendMessageRequest,
    SendMessageResponse, StatusResponse, WazzupWebhookResponse, WebhookTestResponse, SERVICE_NAME,
};
use crate::{AppState, HandlerError};
use axum::{extract::State, http::HeaderMap, response::Json};
use bytes::Bytes;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};
use wazzup_podio_core::webhook::SIGNATURE_HEADER;
use wazzup_podio_core::{forward_comment, normalize_payload, PodioComment, ValidationError};

/// Podio hook type that triggers a reply to chat
pub const COMMENT_CREATE_EVENT: &str = "comment.create";

/// Podio hook type that is acknowledged without action
pub const ITEM_UPDATE_EVENT: &str = "item.update";

// ============================================================================
// Health
// ============================================================================

pub async fn handle_index() -> Json<IndexResponse> {
    Json(IndexResponse {
        status: "active".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Report whether Podio is reachable with the configured credentials.
#[instrument(skip(state))]
pub async fn handle_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let podio_connected = state.record_store.check_connection().await;

    Json(StatusResponse {
        service: SERVICE_NAME.to_string(),
        status: "running".to_string(),
        connections: ConnectionStatus::from_podio(podio_connected),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

// ============================================================================
// Wazzup → Podio
// ============================================================================

/// Relay a Wazzup webhook into Podio.
///
/// The body is parsed before the signature is checked, so an empty or
/// malformed body is a 400 even when the signature is also wrong. Records
/// are created one at a time in payload order; the request succeeds when at
/// least one item was created.
#[instrument(skip(state, headers, body), fields(body_size = body.len()))]
pub async fn handle_wazzup_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WazzupWebhookResponse>, HandlerError> {
    let payload = parse_json_body(&body)?;
    debug!(payload = %payload, "Received Wazzup webhook");

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());
    state
        .signature_validator
        .validate_signature(&body, signature)
        .map_err(HandlerError::InvalidSignature)?;

    let records = normalize_payload(&payload);
    if records.is_empty() {
        warn!("Webhook contained no processable data");
        return Ok(Json(WazzupWebhookResponse::ignored()));
    }

    let mut created = Vec::with_capacity(records.len());
    let mut failures = 0;
    for record in &records {
        match state.record_store.create_message_item(record).await {
            Ok(item) => {
                info!(
                    message_id = %record.message_id(),
                    item_id = item.item_id,
                    "Record sent to Podio"
                );
                created.push(item);
            }
            Err(e) => {
                error!(
                    message_id = %record.message_id(),
                    error = %e,
                    "Failed to send record to Podio"
                );
                failures += 1;
            }
        }
    }

    if created.is_empty() {
        return Err(HandlerError::AllItemsFailed { failures });
    }

    Ok(Json(WazzupWebhookResponse::success(created)))
}

// ============================================================================
// Podio → chat
// ============================================================================

/// Handle a Podio hook.
///
/// `comment.create` forwards the comment to its chat. The comment is read
/// from the `comment` object when present, otherwise from the top level.
#[instrument(skip(state, body))]
pub async fn handle_podio_webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PodioWebhookResponse>, HandlerError> {
    let payload = parse_json_body(&body)?;
    let event_type = payload.get("type").and_then(Value::as_str);

    match event_type {
        Some(COMMENT_CREATE_EVENT) => {
            let source = payload
                .get("comment")
                .filter(|c| c.is_object())
                .unwrap_or(&payload);
            let comment = PodioComment::from_json(source);

            let result = forward_comment(
                state.message_sender.as_ref(),
                &comment,
                state.config.relay.reply_fallback_chat_id.as_deref(),
            )
            .await?;

            Ok(Json(PodioWebhookResponse::sent(result)))
        }
        Some(ITEM_UPDATE_EVENT) => {
            info!("Podio item updated");
            Ok(Json(PodioWebhookResponse::acknowledged(ITEM_UPDATE_EVENT)))
        }
        other => {
            debug!(event_type = ?other, "Ignoring Podio hook");
            Ok(Json(PodioWebhookResponse::ignored(other)))
        }
    }
}

/// Send one message to chat.
#[instrument(skip(state, body))]
pub async fn handle_send_message(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SendMessageResponse>, HandlerError> {
    let payload = parse_json_body(&body)?;
    let request: SendMessageRequest =
        serde_json::from_value(payload).map_err(|e| HandlerError::InvalidJson {
            message: e.to_string(),
        })?;

    let chat_id = required_field(request.chat_id.as_deref(), "chat_id")?;
    let text = required_field(request.text.as_deref(), "text")?;

    let result = state.message_sender.send_message(chat_id, text).await?;
    info!(chat_id = %chat_id, "Message sent");

    Ok(Json(SendMessageResponse {
        status: "sent".to_string(),
        result,
    }))
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Echo back whatever JSON was posted.
pub async fn handle_webhook_test(body: Bytes) -> Result<Json<WebhookTestResponse>, HandlerError> {
    let received_data = parse_json_body(&body)?;
    info!(payload = %received_data, "Test webhook received");

    Ok(Json(WebhookTestResponse {
        status: "success".to_string(),
        message: "Test webhook received".to_string(),
        received_data,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}

pub async fn handle_not_found() -> HandlerError {
    HandlerError::NotFound
}

// ============================================================================
// Helpers
// ============================================================================

/// Parse a request body as JSON.
///
/// Empty bodies and empty JSON values (`null`, `{}`, `[]`, `""`) are
/// rejected as [`HandlerError::EmptyBody`].
pub fn parse_json_body(body: &[u8]) -> Result<Value, HandlerError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(HandlerError::EmptyBody);
    }

    let value: Value = serde_json::from_slice(body).map_err(|e| HandlerError::InvalidJson {
        message: e.to_string(),
    })?;

    let is_empty = match &value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    };

    if is_empty {
        return Err(HandlerError::EmptyBody);
    }

    Ok(value)
}

fn required_field<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, HandlerError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::Required {
            field: field.to_string(),
        }
        .into()),
    }
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
