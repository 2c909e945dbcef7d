//! Tests for outbound interface types.

use super::*;

#[test]
fn test_created_item_serializes_flat() {
    let item = CreatedItem {
        item_id: 42,
        podio_url: "https://podio.com/app/7/items/42".to_string(),
    };

    let value = serde_json::to_value(&item).unwrap();

    assert_eq!(value["item_id"], 42);
    assert_eq!(value["podio_url"], "https://podio.com/app/7/items/42");
}

#[test]
fn test_error_display_includes_status() {
    let error = OutboundError::Upstream {
        status: 503,
        message: "maintenance".to_string(),
    };

    assert_eq!(error.to_string(), "Upstream returned HTTP 503: maintenance");
    assert!(!error.is_configuration_error());
}

#[test]
fn test_configuration_errors() {
    assert!(OutboundError::NotConfigured {
        message: "no api key".to_string()
    }
    .is_configuration_error());
    assert!(OutboundError::Authentication {
        message: "bad token".to_string()
    }
    .is_configuration_error());
}

#[tokio::test]
async fn test_mock_sender_returns_configured_value() {
    let mut sender = MockMessageSender::new();
    sender
        .expect_send_message()
        .returning(|_, _| Ok(serde_json::json!({"messageId": "x"})));

    let result = sender.send_message("1@c.us", "hi").await;

    assert_eq!(result.unwrap()["messageId"], "x");
}
