//! Wazzup payload normalization.
//!
//! A Wazzup webhook body is a JSON object with optional `messages` and
//! `statuses` arrays. Each entry becomes at most one [`CanonicalRecord`].
//! Messages come first, then statuses, each in payload order.

use super::NormalizationError;
use crate::records::{
    CanonicalRecord, ChatType, ContactInfo, Direction, MessageRecord, MessageType, StatusKind,
    StatusRecord,
};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

/// Contact name used when Wazzup does not provide one
pub const UNKNOWN_CONTACT: &str = "Unknown contact";

/// Delivery status recorded for messages that carry none
pub const DEFAULT_DELIVERY_STATUS: &str = "inbound";

/// Convert a Wazzup webhook payload into canonical records.
///
/// Never fails: unrecognized payloads produce an empty list and malformed
/// entries are logged and skipped without affecting their neighbours.
pub fn normalize_payload(payload: &Value) -> Vec<CanonicalRecord> {
    let Some(object) = payload.as_object() else {
        debug!("Ignoring non-object webhook payload");
        return Vec::new();
    };

    let mut records = Vec::new();

    for (index, entry) in entries(object, "messages").iter().enumerate() {
        match parse_message(entry) {
            Ok(message) => {
                info!(
                    message_id = %message.message_id,
                    chat_type = %message.chat_type,
                    direction = %message.direction,
                    message_type = %message.message_type,
                    "Normalized message"
                );
                records.push(CanonicalRecord::Message(message));
            }
            Err(e) => warn!(index, error = %e, "Skipping malformed message entry"),
        }
    }

    for (index, entry) in entries(object, "statuses").iter().enumerate() {
        match parse_status(entry) {
            Ok(Some(status)) => {
                info!(
                    message_id = %status.message_id,
                    status = %status.status,
                    "Normalized status update"
                );
                records.push(CanonicalRecord::Status(status));
            }
            Ok(None) => {}
            Err(e) => warn!(index, error = %e, "Skipping malformed status entry"),
        }
    }

    records
}

/// Parse one entry of the `messages` array.
pub fn parse_message(entry: &Value) -> Result<MessageRecord, NormalizationError> {
    let fields = entry.as_object().ok_or(NormalizationError::NotAnObject)?;

    let chat_id = string_field(fields, "chatId")?.unwrap_or_default();
    let contact = parse_contact(fields, &chat_id)?;

    Ok(MessageRecord {
        message_id: string_field(fields, "messageId")?.unwrap_or_default(),
        channel_id: string_field(fields, "channelId")?.unwrap_or_default(),
        chat_type: ChatType::from(string_field(fields, "chatType")?.unwrap_or_default()),
        message_type: string_field(fields, "type")?
            .map(MessageType::from)
            .unwrap_or_default(),
        direction: Direction::from_echo(bool_field(fields, "isEcho")?),
        delivery_status: string_field(fields, "status")?
            .unwrap_or_else(|| DEFAULT_DELIVERY_STATUS.to_string()),
        message_text: string_field(fields, "text")?.unwrap_or_default(),
        content_uri: non_empty(string_field(fields, "contentUri")?),
        author_id: string_field(fields, "authorId")?.unwrap_or_default(),
        author_name: string_field(fields, "authorName")?.unwrap_or_default(),
        is_edited: bool_field(fields, "isEdited")?,
        is_deleted: bool_field(fields, "isDeleted")?,
        sent_from_app: bool_field(fields, "sentFromApp")?,
        timestamp: timestamp_field(fields, "dateTime")?,
        chat_id,
        contact,
        raw: entry.clone(),
    })
}

/// Parse one entry of the `statuses` array.
///
/// Returns `Ok(None)` for statuses that are not relayed (anything other than
/// delivered, read, error and edited).
pub fn parse_status(entry: &Value) -> Result<Option<StatusRecord>, NormalizationError> {
    let fields = entry.as_object().ok_or(NormalizationError::NotAnObject)?;

    let message_id = string_field(fields, "messageId")?.unwrap_or_default();
    let status = string_field(fields, "status")?.unwrap_or_default();

    let Some(status) = StatusKind::parse(&status) else {
        debug!(message_id = %message_id, status = %status, "Dropping status outside allow-list");
        return Ok(None);
    };

    Ok(Some(StatusRecord {
        message_id,
        status,
        timestamp: timestamp_field(fields, "timestamp")?,
        raw: entry.clone(),
    }))
}

// ============================================================================
// Field Extraction
// ============================================================================

fn entries<'a>(object: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    match object.get(key) {
        None | Some(Value::Null) => &[],
        Some(Value::Array(items)) => items,
        Some(_) => {
            warn!(key, "Webhook key is not an array, skipping");
            &[]
        }
    }
}

fn parse_contact(
    fields: &Map<String, Value>,
    chat_id: &str,
) -> Result<ContactInfo, NormalizationError> {
    let empty = Map::new();
    let contact = match fields.get("contact") {
        None | Some(Value::Null) => &empty,
        Some(Value::Object(contact)) => contact,
        Some(_) => return Err(NormalizationError::invalid_type("contact", "object")),
    };

    Ok(ContactInfo {
        name: non_empty(string_field(contact, "name")?)
            .unwrap_or_else(|| UNKNOWN_CONTACT.to_string()),
        phone: non_empty(string_field(contact, "phone")?).unwrap_or_else(|| chat_id.to_string()),
        username: non_empty(string_field(contact, "username")?),
        avatar_uri: non_empty(string_field(contact, "avatarUri")?),
    })
}

/// Read a scalar as text. Numbers and booleans are rendered; containers are
/// malformed.
fn string_field(
    fields: &Map<String, Value>,
    key: &str,
) -> Result<Option<String>, NormalizationError> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(Value::Array(_)) | Some(Value::Object(_)) => {
            Err(NormalizationError::invalid_type(key, "string"))
        }
    }
}

fn bool_field(fields: &Map<String, Value>, key: &str) -> Result<bool, NormalizationError> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(NormalizationError::invalid_type(key, "boolean")),
    }
}

fn timestamp_field(fields: &Map<String, Value>, key: &str) -> Result<String, NormalizationError> {
    Ok(non_empty(string_field(fields, key)?).unwrap_or_else(|| chrono::Utc::now().to_rfc3339()))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "normalizer_tests.rs"]
mod tests;
