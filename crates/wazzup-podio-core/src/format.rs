//! Rendering of canonical records as Podio comment text.
//!
//! Comments use Podio's markdown subset. The output is deterministic for a
//! given record, and formatting never fails toward the caller: an internal
//! write error degrades to a short diagnostic string.

use crate::records::{
    parse_timestamp, CanonicalRecord, ChatType, Direction, MessageRecord, MessageType, StatusKind,
    StatusRecord,
};
use std::fmt::{self, Write};
use tracing::warn;

/// Display format for timestamps in comments
pub const DISPLAY_TIME_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Number of message-id characters shown in status comments
const STATUS_ID_PREFIX_LEN: usize = 8;

// ============================================================================
// Public Entry Points
// ============================================================================

/// Render any canonical record.
pub fn format_record(record: &CanonicalRecord) -> String {
    match record {
        CanonicalRecord::Message(message) => format_message(message),
        CanonicalRecord::Status(status) => format_status(status),
    }
}

/// Render a chat message.
///
/// ```text
/// 💬 **Ann** (79000000000)
/// 📥 01.05.2024 10:00
///
/// hi
/// ```
pub fn format_message(message: &MessageRecord) -> String {
    render(|out| write_message(out, message))
}

/// Render a delivery-status update.
pub fn format_status(status: &StatusRecord) -> String {
    render(|out| write_status(out, status))
}

fn render<F>(write: F) -> String
where
    F: FnOnce(&mut String) -> fmt::Result,
{
    let mut out = String::new();
    match write(&mut out) {
        Ok(()) => out,
        Err(e) => {
            warn!(error = %e, "Message formatting failed");
            format!("Message formatting failed: {}", e)
        }
    }
}

// ============================================================================
// Layout
// ============================================================================

fn write_message(out: &mut String, message: &MessageRecord) -> fmt::Result {
    let contact = &message.contact;

    write!(
        out,
        "{} **{}**",
        messenger_glyph(&message.chat_type),
        contact.name
    )?;

    let username = contact.username.as_deref().unwrap_or_default();
    if !username.is_empty() {
        write!(out, " (@{})", username)?;
    }
    if !contact.phone.is_empty() && contact.phone != username {
        write!(out, " ({})", contact.phone)?;
    }

    write!(
        out,
        "\n{} {}",
        direction_glyph(message.direction),
        display_time(&message.timestamp)
    )?;
    if message.is_edited {
        out.write_str(" ✏️ *edited*")?;
    }
    if message.is_deleted {
        out.write_str(" 🗑️ *deleted*")?;
    }
    out.write_str("\n\n")?;

    if message.message_type.is_text() {
        out.write_str(&message.message_text)?;
    } else {
        write!(
            out,
            "{} {}",
            type_glyph(&message.message_type),
            title_case(message.message_type.as_str())
        )?;
        if !message.message_text.is_empty() {
            write!(out, "\n{}", message.message_text)?;
        }
    }

    if let Some(uri) = message.content_uri.as_deref().filter(|u| !u.is_empty()) {
        write!(out, "\n\n🔗 [File]({})", uri)?;
    }

    Ok(())
}

fn write_status(out: &mut String, status: &StatusRecord) -> fmt::Result {
    let id_prefix: String = status
        .message_id
        .chars()
        .take(STATUS_ID_PREFIX_LEN)
        .collect();

    write!(
        out,
        "{} **Status updated**: {}\n🕐 {}\n📨 ID: {}...",
        status_glyph(status.status),
        status.status.as_str(),
        display_time(&status.timestamp),
        id_prefix
    )
}

// ============================================================================
// Glyph Tables
// ============================================================================

pub fn messenger_glyph(chat_type: &ChatType) -> &'static str {
    match chat_type {
        ChatType::Whatsapp => "💬",
        ChatType::Whatsgroup => "👥",
        ChatType::Telegram => "✈️",
        ChatType::Telegroup => "👥✈️",
        ChatType::Instagram => "📷",
        ChatType::Viber => "💜",
        ChatType::Vk => "🔵",
        ChatType::Avito => "🏠",
        ChatType::Other(_) => "📱",
    }
}

/// Glyph shown before non-text message bodies; text has none.
pub fn type_glyph(message_type: &MessageType) -> &'static str {
    match message_type {
        MessageType::Text => "",
        MessageType::Image => "🖼️",
        MessageType::Video => "🎥",
        MessageType::Audio => "🎵",
        MessageType::Document => "📄",
        MessageType::Vcard => "👤",
        MessageType::Geo => "📍",
        MessageType::WapiTemplate => "📋",
        MessageType::Unsupported => "❓",
        MessageType::MissingCall => "📞",
        MessageType::Other(_) => "📎",
    }
}

pub fn direction_glyph(direction: Direction) -> &'static str {
    match direction {
        Direction::Outbound => "📤",
        Direction::Inbound => "📥",
    }
}

pub fn status_glyph(status: StatusKind) -> &'static str {
    match status {
        StatusKind::Delivered => "✅",
        StatusKind::Read => "👁️",
        StatusKind::Error => "❌",
        StatusKind::Edited => "✏️",
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Format a wire timestamp for display, falling back to the raw string.
pub fn display_time(timestamp: &str) -> String {
    match parse_timestamp(timestamp) {
        Some(parsed) => parsed.format(DISPLAY_TIME_FORMAT).to_string(),
        None => timestamp.to_string(),
    }
}

/// Capitalize the first letter of every alphabetic run and lowercase the rest.
///
/// `wapi_template` becomes `Wapi_Template`.
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut previous_is_alpha = false;

    for c in value.chars() {
        if previous_is_alpha {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        previous_is_alpha = c.is_alphabetic();
    }

    out
}

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;
