//! Podio item field mapping.
//!
//! Podio items are created from a sparse map of external field ids to field
//! values. Only the fields listed in [`ItemField`] are ever written.

use crate::records::{parse_timestamp, CanonicalRecord, MessageRecord, StatusRecord};
use crate::SOURCE_NAME;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Date format Podio expects in date fields
pub const PODIO_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// External ids of the Podio app fields the relay writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemField {
    ContactName,
    ContactPhone,
    MessageText,
    MessageType,
    Direction,
    MessageDate,
    ChatId,
    Source,
}

impl ItemField {
    pub fn external_id(&self) -> &'static str {
        match self {
            Self::ContactName => "contact-name",
            Self::ContactPhone => "contact-phone",
            Self::MessageText => "message-text",
            Self::MessageType => "message-type",
            Self::Direction => "direction",
            Self::MessageDate => "message-date",
            Self::ChatId => "chat-id",
            Self::Source => "source",
        }
    }
}

/// Sparse set of Podio field values
///
/// Serializes as a JSON object keyed by external field id, which is the shape
/// Podio expects under `"fields"` when creating or updating an item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemFields(BTreeMap<ItemField, Value>);

impl ItemFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the field map for a canonical record.
    pub fn from_record(record: &CanonicalRecord) -> Self {
        match record {
            CanonicalRecord::Message(message) => Self::from_message(message),
            CanonicalRecord::Status(status) => Self::from_status(status),
        }
    }

    pub fn from_message(message: &MessageRecord) -> Self {
        let mut fields = Self::new();
        fields.set_text(ItemField::ContactName, &message.contact.name);
        fields.set_text(ItemField::ContactPhone, &message.contact.phone);
        fields.set_text(ItemField::MessageText, &message.message_text);
        fields.set_text(ItemField::MessageType, message.message_type.as_str());
        fields.set_text(ItemField::Direction, message.direction.as_str());
        fields.set_date(ItemField::MessageDate, &message.timestamp);
        fields.set_text(ItemField::ChatId, &message.chat_id);
        fields.set_text(ItemField::Source, SOURCE_NAME);
        fields
    }

    pub fn from_status(status: &StatusRecord) -> Self {
        let mut fields = Self::new();
        fields.set_date(ItemField::MessageDate, &status.timestamp);
        fields.set_text(ItemField::Source, SOURCE_NAME);
        fields
    }

    /// Set a `{"value": ...}` field; empty text leaves the field unset.
    pub fn set_text(&mut self, field: ItemField, value: &str) {
        if value.is_empty() {
            return;
        }
        self.0.insert(field, json!({ "value": value }));
    }

    /// Set a `{"start": ...}` date field; unparseable timestamps leave it unset.
    pub fn set_date(&mut self, field: ItemField, timestamp: &str) {
        if let Some(parsed) = parse_timestamp(timestamp) {
            let start = parsed.format(PODIO_DATE_FORMAT).to_string();
            self.0.insert(field, json!({ "start": start }));
        }
    }

    /// Insert an arbitrary field value.
    pub fn insert(&mut self, field: ItemField, value: Value) {
        self.0.insert(field, value);
    }

    pub fn get(&self, field: ItemField) -> Option<&Value> {
        self.0.get(&field)
    }

    pub fn contains(&self, field: ItemField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Request body for item create/update calls.
    pub fn to_request_body(&self) -> Value {
        json!({ "fields": self })
    }
}

#[cfg(test)]
#[path = "fields_tests.rs"]
mod tests;
