//! Record builders shared by unit tests.

use crate::records::{
    ChatType, ContactInfo, Direction, MessageRecord, MessageType, StatusKind, StatusRecord,
};
use serde_json::json;

/// Inbound WhatsApp text message from "Ann".
pub fn sample_message() -> MessageRecord {
    MessageRecord {
        message_id: "m1".to_string(),
        channel_id: "chan-1".to_string(),
        chat_id: "79000000000".to_string(),
        chat_type: ChatType::Whatsapp,
        message_type: MessageType::Text,
        direction: Direction::Inbound,
        delivery_status: "inbound".to_string(),
        message_text: "hi".to_string(),
        content_uri: None,
        contact: ContactInfo {
            name: "Ann".to_string(),
            phone: "79000000000".to_string(),
            username: None,
            avatar_uri: None,
        },
        author_id: String::new(),
        author_name: String::new(),
        is_edited: false,
        is_deleted: false,
        sent_from_app: false,
        timestamp: "2024-05-01T10:00:00Z".to_string(),
        raw: json!({"messageId": "m1"}),
    }
}

pub fn sample_status(status: StatusKind) -> StatusRecord {
    StatusRecord {
        message_id: "abcdef123456".to_string(),
        status,
        timestamp: "2024-05-01T10:05:00Z".to_string(),
        raw: json!({"messageId": "abcdef123456", "status": status.as_str()}),
    }
}
