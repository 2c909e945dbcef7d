//! Common test utilities for relay integration tests
//!
//! This module provides:
//! - A router wired to the real Podio and Wazzup clients, pointed at
//!   `wiremock` servers
//! - Mock mounts for the Podio token, item and comment endpoints
//! - Request and payload builders

use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;
use std::sync::Arc;
use wazzup_podio_api::{create_router, AppState, ServiceConfig};
use wazzup_podio_clients::{PodioClient, PodioConfig, WazzupClient, WazzupConfig};
use wazzup_podio_core::HmacSignatureValidator;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const WEBHOOK_SECRET: &str = "integration-secret";
pub const APP_ID: &str = "777";

/// Mock upstreams plus the router under test
pub struct Relay {
    pub router: Router,
    pub podio: MockServer,
    pub wazzup: MockServer,
}

impl Relay {
    pub async fn start() -> Self {
        Self::start_with(ServiceConfig::default(), "").await
    }

    #[allow(dead_code)]
    pub async fn start_signed() -> Self {
        Self::start_with(ServiceConfig::default(), WEBHOOK_SECRET).await
    }

    pub async fn start_with(mut config: ServiceConfig, secret: &str) -> Self {
        let podio = MockServer::start().await;
        let wazzup = MockServer::start().await;

        config.podio = PodioConfig::default()
            .with_api_url(podio.uri())
            .with_web_url("https://podio.example")
            .with_credentials("client-1", "client-secret", APP_ID, "app-token");
        config.wazzup = WazzupConfig::default()
            .with_api_url(wazzup.uri())
            .with_api_key("wz-key")
            .with_channel_id("chan-1")
            .with_webhook_secret(secret);

        let podio_client = PodioClient::new(config.podio.clone()).unwrap();
        let wazzup_client = WazzupClient::new(config.wazzup.clone()).unwrap();
        let state = AppState::new(
            config,
            Arc::new(HmacSignatureValidator::new(secret)),
            Arc::new(podio_client),
            Arc::new(wazzup_client),
        );

        Self {
            router: create_router(state),
            podio,
            wazzup,
        }
    }

    /// Requests Podio received on `path`.
    #[allow(dead_code)]
    pub async fn podio_requests(&self, request_path: &str) -> Vec<Value> {
        self.podio
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == request_path)
            .map(|r| serde_json::from_slice(&r.body).unwrap_or(Value::Null))
            .collect()
    }
}

/// Mount a token endpoint that always succeeds.
#[allow(dead_code)]
pub async fn mount_podio_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "token-1",
            "expires_in": 3600
        })))
        .mount(server)
        .await;
}

/// Mount item creation returning `item_id` and an accepting comment endpoint.
#[allow(dead_code)]
pub async fn mount_podio_items(server: &MockServer, item_id: u64) {
    Mock::given(method("POST"))
        .and(path(format!("/item/app/{}/", APP_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "item_id": item_id })))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/comment/item/{}/", item_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "comment_id": 1 })))
        .mount(server)
        .await;
}

#[allow(dead_code)]
pub fn post_json(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

#[allow(dead_code)]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[allow(dead_code)]
pub fn sign(body: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(WEBHOOK_SECRET.as_bytes()).unwrap();
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Inbound WhatsApp text message from Ann.
#[allow(dead_code)]
pub fn text_message_payload() -> Value {
    json!({
        "messages": [{
            "messageId": "m1",
            "channelId": "chan-1",
            "chatId": "79000000000",
            "chatType": "whatsapp",
            "type": "text",
            "status": "inbound",
            "text": "hi",
            "dateTime": "2024-05-01T10:00:00Z",
            "isEcho": false,
            "contact": { "name": "Ann", "phone": "79000000000" }
        }]
    })
}
