//! Tests for comment rendering.

use super::*;
use crate::records::ContactInfo;
use crate::test_support::{sample_message, sample_status};

mod message_layout_tests {
    use super::*;

    /// A WhatsApp text message starts with the WhatsApp glyph and bold name.
    #[test]
    fn test_whatsapp_text_header() {
        let formatted = format_message(&sample_message());

        assert!(
            formatted.starts_with("💬 **Ann**"),
            "unexpected header: {}",
            formatted
        );
    }

    /// The complete layout of a plain inbound text message.
    #[test]
    fn test_full_text_layout() {
        let formatted = format_message(&sample_message());

        assert_eq!(
            formatted,
            "💬 **Ann** (79000000000)\n📥 01.05.2024 10:00\n\nhi"
        );
    }

    /// Username is shown with `@`, and a phone equal to it is not repeated.
    #[test]
    fn test_username_and_phone() {
        let mut message = sample_message();
        message.contact = ContactInfo {
            name: "Bob".to_string(),
            phone: "bobby".to_string(),
            username: Some("bobby".to_string()),
            avatar_uri: None,
        };

        let formatted = format_message(&message);

        assert!(formatted.starts_with("💬 **Bob** (@bobby)\n"));
        assert!(!formatted.contains("(bobby)"));
    }

    /// Edited and deleted markers follow the time.
    #[test]
    fn test_edited_and_deleted_markers() {
        let mut message = sample_message();
        message.is_edited = true;
        message.is_deleted = true;
        message.direction = Direction::Outbound;

        let formatted = format_message(&message);

        assert!(formatted.contains("\n📤 01.05.2024 10:00 ✏️ *edited* 🗑️ *deleted*\n\n"));
    }

    /// Non-text bodies show the type glyph, the title-cased type and the caption.
    #[test]
    fn test_media_body_and_link() {
        let mut message = sample_message();
        message.chat_type = ChatType::Telegram;
        message.message_type = MessageType::WapiTemplate;
        message.message_text = "caption".to_string();
        message.content_uri = Some("https://files.example/doc.pdf".to_string());

        let formatted = format_message(&message);

        assert!(formatted.starts_with("✈️ **Ann**"));
        assert!(formatted.ends_with(
            "\n\n📋 Wapi_Template\ncaption\n\n🔗 [File](https://files.example/doc.pdf)"
        ));
    }

    /// A media message without text has no caption line.
    #[test]
    fn test_media_without_caption() {
        let mut message = sample_message();
        message.message_type = MessageType::Image;
        message.message_text = String::new();

        let formatted = format_message(&message);

        assert!(formatted.ends_with("\n\n🖼️ Image"));
    }

    /// Unknown messenger and type fall back to generic glyphs.
    #[test]
    fn test_unknown_messenger_and_type() {
        let mut message = sample_message();
        message.chat_type = ChatType::Other("wechat".to_string());
        message.message_type = MessageType::Other("sticker".to_string());

        let formatted = format_message(&message);

        assert!(formatted.starts_with("📱 **Ann**"));
        assert!(formatted.contains("📎 Sticker"));
    }

    /// Unparseable timestamps are shown verbatim.
    #[test]
    fn test_raw_timestamp_fallback() {
        let mut message = sample_message();
        message.timestamp = "sometime".to_string();

        let formatted = format_message(&message);

        assert!(formatted.contains("\n📥 sometime\n"));
    }

    /// Formatting the same record twice gives the same text.
    #[test]
    fn test_formatting_is_deterministic() {
        let record = CanonicalRecord::Message(sample_message());

        assert_eq!(format_record(&record), format_record(&record));
    }
}

mod status_layout_tests {
    use super::*;

    /// Status comments show icon, name, time and a truncated id.
    #[test]
    fn test_status_layout() {
        let formatted = format_status(&sample_status(StatusKind::Delivered));

        assert_eq!(
            formatted,
            "✅ **Status updated**: delivered\n🕐 01.05.2024 10:05\n📨 ID: abcdef12..."
        );
    }

    /// Short ids are not padded.
    #[test]
    fn test_short_id_not_padded() {
        let mut status = sample_status(StatusKind::Read);
        status.message_id = "ab".to_string();

        let formatted = format_record(&CanonicalRecord::Status(status));

        assert!(formatted.starts_with("👁️ **Status updated**: read"));
        assert!(formatted.ends_with("📨 ID: ab..."));
    }
}

mod helper_tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("wapi_template"), "Wapi_Template");
        assert_eq!(title_case("missing_call"), "Missing_Call");
        assert_eq!(title_case("vcard"), "Vcard");
        assert_eq!(title_case("IMAGE"), "Image");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_display_time_keeps_offset() {
        assert_eq!(display_time("2024-12-31T23:59:00+05:00"), "31.12.2024 23:59");
        assert_eq!(display_time("2024-12-31 08:01:02"), "31.12.2024 08:01");
    }

    #[test]
    fn test_text_has_no_type_glyph() {
        assert_eq!(type_glyph(&MessageType::Text), "");
        assert_eq!(direction_glyph(Direction::Inbound), "📥");
        assert_eq!(status_glyph(StatusKind::Error), "❌");
        assert_eq!(messenger_glyph(&ChatType::Telegroup), "👥✈️");
    }
}
