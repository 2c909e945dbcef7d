//! Canonical records produced from Wazzup webhook payloads.
//!
//! Wazzup reports messages and delivery statuses in several loosely-typed
//! shapes. The normalizer turns every entry into one of the records defined
//! here; everything downstream (formatting, Podio field mapping) works only
//! with these types.
//!
//! Records are request-scoped: they are built for one inbound webhook,
//! consumed, and dropped.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Classification Enums
// ============================================================================

/// Messenger the chat lives in, as reported by Wazzup's `chatType`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChatType {
    Whatsapp,
    Whatsgroup,
    Telegram,
    Telegroup,
    Instagram,
    Viber,
    Vk,
    Avito,
    /// Any messenger Wazzup adds that we have no glyph for yet
    Other(String),
}

impl ChatType {
    /// Wire name used by the Wazzup API
    pub fn as_str(&self) -> &str {
        match self {
            Self::Whatsapp => "whatsapp",
            Self::Whatsgroup => "whatsgroup",
            Self::Telegram => "telegram",
            Self::Telegroup => "telegroup",
            Self::Instagram => "instagram",
            Self::Viber => "viber",
            Self::Vk => "vk",
            Self::Avito => "avito",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for ChatType {
    fn from(value: &str) -> Self {
        match value {
            "whatsapp" => Self::Whatsapp,
            "whatsgroup" => Self::Whatsgroup,
            "telegram" => Self::Telegram,
            "telegroup" => Self::Telegroup,
            "instagram" => Self::Instagram,
            "viber" => Self::Viber,
            "vk" => Self::Vk,
            "avito" => Self::Avito,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for ChatType {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<ChatType> for String {
    fn from(value: ChatType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ChatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of content carried by a message, as reported by Wazzup's `type`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MessageType {
    #[default]
    Text,
    Image,
    Video,
    Audio,
    Document,
    /// Contact card
    Vcard,
    /// Location
    Geo,
    WapiTemplate,
    Unsupported,
    MissingCall,
    Other(String),
}

impl MessageType {
    /// Wire name used by the Wazzup API
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Document => "document",
            Self::Vcard => "vcard",
            Self::Geo => "geo",
            Self::WapiTemplate => "wapi_template",
            Self::Unsupported => "unsupported",
            Self::MissingCall => "missing_call",
            Self::Other(name) => name,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text)
    }
}

impl From<&str> for MessageType {
    fn from(value: &str) -> Self {
        match value {
            "text" => Self::Text,
            "image" => Self::Image,
            "video" => Self::Video,
            "audio" => Self::Audio,
            "document" => Self::Document,
            "vcard" => Self::Vcard,
            "geo" => Self::Geo,
            "wapi_template" => Self::WapiTemplate,
            "unsupported" => Self::Unsupported,
            "missing_call" => Self::MissingCall,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for MessageType {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<MessageType> for String {
    fn from(value: MessageType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a message came from the customer or was sent by us
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Inbound,
    Outbound,
}

impl Direction {
    /// Echoes are messages we sent ourselves that Wazzup reports back.
    pub fn from_echo(is_echo: bool) -> Self {
        if is_echo {
            Self::Outbound
        } else {
            Self::Inbound
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery statuses that are relayed to Podio
///
/// Wazzup reports more statuses than these (`sent`, `queued`, ...); the
/// normalizer drops everything that does not parse into this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Delivered,
    Read,
    Error,
    Edited,
}

impl StatusKind {
    /// Parse a wire status, returning `None` for statuses outside the allow-list
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "delivered" => Some(Self::Delivered),
            "read" => Some(Self::Read),
            "error" => Some(Self::Error),
            "edited" => Some(Self::Edited),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delivered => "delivered",
            Self::Read => "read",
            Self::Error => "error",
            Self::Edited => "edited",
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Records
// ============================================================================

/// Contact details attached to a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub phone: String,
    pub username: Option<String>,
    pub avatar_uri: Option<String>,
}

/// Normalized chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub message_id: String,
    pub channel_id: String,
    pub chat_id: String,
    pub chat_type: ChatType,
    pub message_type: MessageType,
    pub direction: Direction,
    /// Raw `status` reported alongside the message
    pub delivery_status: String,
    pub message_text: String,
    pub content_uri: Option<String>,
    pub contact: ContactInfo,
    pub author_id: String,
    pub author_name: String,
    pub is_edited: bool,
    pub is_deleted: bool,
    pub sent_from_app: bool,
    /// ISO-8601 instant exactly as received (or generated when absent)
    pub timestamp: String,
    pub raw: serde_json::Value,
}

/// Normalized delivery-status update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub message_id: String,
    pub status: StatusKind,
    pub timestamp: String,
    pub raw: serde_json::Value,
}

/// One normalized webhook entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum CanonicalRecord {
    Message(MessageRecord),
    #[serde(rename = "status_update")]
    Status(StatusRecord),
}

impl CanonicalRecord {
    pub fn message_id(&self) -> &str {
        match self {
            Self::Message(m) => &m.message_id,
            Self::Status(s) => &s.message_id,
        }
    }

    pub fn timestamp(&self) -> &str {
        match self {
            Self::Message(m) => &m.timestamp,
            Self::Status(s) => &s.timestamp,
        }
    }

    pub fn is_status(&self) -> bool {
        matches!(self, Self::Status(_))
    }
}

impl From<MessageRecord> for CanonicalRecord {
    fn from(value: MessageRecord) -> Self {
        Self::Message(value)
    }
}

impl From<StatusRecord> for CanonicalRecord {
    fn from(value: StatusRecord) -> Self {
        Self::Status(value)
    }
}

// ============================================================================
// Timestamps
// ============================================================================

/// Parse a Wazzup ISO-8601 timestamp into wall-clock time.
///
/// Offset-bearing values keep the wall-clock time of their own offset; no
/// conversion to UTC happens. Naive date-times (with `T` or a space as the
/// separator, optional seconds and fractions) are accepted as-is, and a bare
/// date means midnight.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_local());
    }
    if let Ok(parsed) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M%#z") {
        return Some(parsed.naive_local());
    }

    let naive = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ]
    .iter()
    .find_map(|pattern| NaiveDateTime::parse_from_str(value, pattern).ok());

    naive.or_else(|| {
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    })
}

#[cfg(test)]
#[path = "records_tests.rs"]
mod tests;
