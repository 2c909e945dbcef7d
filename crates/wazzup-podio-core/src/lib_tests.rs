//! Tests for crate-level types and the normalize → map → format pipeline.

use super::*;
use serde_json::json;

mod validation_error_tests {
    use super::*;

    #[test]
    fn test_required_message() {
        let error = ValidationError::Required {
            field: "chat_id".to_string(),
        };

        assert_eq!(error.to_string(), "Field 'chat_id' is required");
    }

    #[test]
    fn test_invalid_format_message() {
        let error = ValidationError::InvalidFormat {
            field: "X-Wazzup-Signature".to_string(),
            message: "digest mismatch".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Field 'X-Wazzup-Signature' has invalid format: digest mismatch"
        );
    }
}

mod pipeline_tests {
    use super::*;

    /// A normalized message maps to fields and renders a comment.
    #[test]
    fn test_message_flows_through_pipeline() {
        let payload = json!({"messages":[{
            "messageId": "m1",
            "chatId": "79000000000",
            "chatType": "whatsapp",
            "type": "text",
            "text": "hi",
            "isEcho": false,
            "dateTime": "2024-05-01T10:00:00Z",
            "contact": {"name": "Ann"}
        }]});

        let records = normalize_payload(&payload);
        assert_eq!(records.len(), 1);

        let fields = ItemFields::from_record(&records[0]);
        assert_eq!(
            fields.get(ItemField::Source),
            Some(&json!({"value": SOURCE_NAME}))
        );

        let comment = format::format_record(&records[0]);
        assert!(comment.starts_with("💬 **Ann**"));
        assert!(comment.ends_with("\n\nhi"));
    }
}
