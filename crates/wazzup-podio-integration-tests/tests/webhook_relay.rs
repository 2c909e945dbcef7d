//! Wazzup webhook → Podio items, end to end.

mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

/// Verify that one inbound text message creates one item with mapped
/// fields and a formatted comment.
#[tokio::test]
async fn test_text_message_creates_item_and_comment() {
    let relay = Relay::start().await;
    mount_podio_token(&relay.podio).await;
    mount_podio_items(&relay.podio, 555).await;

    let response = relay
        .router
        .clone()
        .oneshot(post_json(
            "/webhook/wazzup",
            text_message_payload().to_string(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["podio_items"][0]["item_id"], 555);
    assert_eq!(
        body["podio_items"][0]["podio_url"],
        "https://podio.example/app/777/items/555"
    );

    let items = relay.podio_requests("/item/app/777/").await;
    assert_eq!(items.len(), 1);
    let fields = &items[0]["fields"];
    assert_eq!(fields["contact-name"]["value"], "Ann");
    assert_eq!(fields["chat-id"]["value"], "79000000000");
    assert_eq!(fields["direction"]["value"], "inbound");
    assert_eq!(fields["message-date"]["start"], "2024-05-01 10:00:00");
    assert_eq!(fields["source"]["value"], "wazzup");

    let comments = relay.podio_requests("/comment/item/555/").await;
    assert_eq!(comments.len(), 1);
    assert_eq!(
        comments[0]["value"],
        "💬 **Ann** (79000000000)\n📥 01.05.2024 10:00\n\nhi"
    );
    assert_eq!(comments[0]["external_id"], "m1");
}

/// Verify that a read status becomes a status item while unlisted
/// statuses are dropped.
#[tokio::test]
async fn test_status_update_creates_status_item() {
    let relay = Relay::start().await;
    mount_podio_token(&relay.podio).await;
    mount_podio_items(&relay.podio, 600).await;

    let payload = json!({
        "statuses": [
            { "messageId": "abcdef123456", "status": "read", "timestamp": "2024-05-01T10:05:00Z" },
            { "messageId": "skipped", "status": "sent", "timestamp": "2024-05-01T10:06:00Z" }
        ]
    });

    let response = relay
        .router
        .clone()
        .oneshot(post_json("/webhook/wazzup", payload.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["podio_items"].as_array().unwrap().len(), 1);

    let items = relay.podio_requests("/item/app/777/").await;
    assert_eq!(items[0]["fields"]["message-date"]["start"], "2024-05-01 10:05:00");
    assert!(items[0]["fields"].get("chat-id").is_none());

    let comments = relay.podio_requests("/comment/item/600/").await;
    let text = comments[0]["value"].as_str().unwrap();
    assert!(text.starts_with("👁️ **Status updated**: read"));
    assert!(text.contains("abcdef12..."));
}

/// Verify that a Podio rejection of every item is reported as 500.
#[tokio::test]
async fn test_podio_rejection_returns_500() {
    let relay = Relay::start().await;
    mount_podio_token(&relay.podio).await;
    Mock::given(method("POST"))
        .and(path("/item/app/777/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_value",
            "error_description": "field 'chat-id' not found"
        })))
        .mount(&relay.podio)
        .await;

    let response = relay
        .router
        .clone()
        .oneshot(post_json(
            "/webhook/wazzup",
            text_message_payload().to_string(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Failed to send any items to Podio");
}

/// Verify that an empty body is rejected without contacting Podio.
#[tokio::test]
async fn test_empty_body_never_reaches_podio() {
    let relay = Relay::start().await;

    let response = relay
        .router
        .clone()
        .oneshot(post_json("/webhook/wazzup", ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(relay
        .podio
        .received_requests()
        .await
        .unwrap_or_default()
        .is_empty());
}

/// Verify that signed webhooks are relayed and unsigned ones refused.
#[tokio::test]
async fn test_signature_enforced_when_secret_configured() {
    let relay = Relay::start_signed().await;
    mount_podio_token(&relay.podio).await;
    mount_podio_items(&relay.podio, 700).await;
    let body = text_message_payload().to_string();

    let unsigned = relay
        .router
        .clone()
        .oneshot(post_json("/webhook/wazzup", body.clone()))
        .await
        .unwrap();
    assert_eq!(unsigned.status(), StatusCode::UNAUTHORIZED);

    let mut signed = post_json("/webhook/wazzup", body.clone());
    signed.headers_mut().insert(
        "x-wazzup-signature",
        format!("sha256={}", sign(body.as_bytes())).parse().unwrap(),
    );
    let response = relay.router.clone().oneshot(signed).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(relay.podio_requests("/item/app/777/").await.len(), 1);
}
