//! Interfaces to the two downstream platforms.
//!
//! The router and the reply path only see these traits. Concrete HTTP
//! clients live in `wazzup-podio-clients`; tests substitute mocks.

use crate::fields::ItemFields;
use crate::records::CanonicalRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A Podio item created for a relayed record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedItem {
    pub item_id: u64,
    pub podio_url: String,
}

/// Store for relayed records (Podio)
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Whether the store is reachable with the configured credentials
    async fn check_connection(&self) -> bool;

    /// Create one item for a record and attach the formatted comment
    async fn create_message_item(
        &self,
        record: &CanonicalRecord,
    ) -> Result<CreatedItem, OutboundError>;

    /// Find the first item whose `chat-id` field equals `chat_id`
    async fn find_item_by_chat_id(&self, chat_id: &str) -> Result<Option<Value>, OutboundError>;

    async fn update_item(&self, item_id: u64, fields: ItemFields) -> Result<Value, OutboundError>;
}

/// Outbound chat delivery (Wazzup)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send `text` to the chat identified by `chat_id`
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<Value, OutboundError>;
}

// ============================================================================
// Error Types
// ============================================================================

/// Failure of a call to a downstream platform
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OutboundError {
    #[error("Client is not configured: {message}")]
    NotConfigured { message: String },

    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("Upstream returned HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Request failed: {message}")]
    Transport { message: String },

    #[error("Unexpected response: {message}")]
    InvalidResponse { message: String },
}

impl OutboundError {
    /// Whether the failure is on our side (credentials or configuration)
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::NotConfigured { .. } | Self::Authentication { .. }
        )
    }
}

#[cfg(test)]
#[path = "outbound_tests.rs"]
mod tests;
