//! # Wazzup-Podio Core
//!
//! Domain logic for the Wazzup-Podio relay.
//!
//! This crate contains everything that does not talk to the network:
//! validating inbound webhook signatures, normalizing Wazzup payloads into
//! canonical records, rendering those records as Podio comment text, and
//! working out which chat a Podio comment should be forwarded to.
//!
//! ## Architecture
//!
//! - Business logic depends only on trait abstractions ([`outbound::RecordStore`],
//!   [`outbound::MessageSender`], [`webhook::SignatureValidator`])
//! - HTTP client implementations live in `wazzup-podio-clients` and are
//!   injected at runtime
//!
//! ## Usage
//!
//! ```rust
//! use wazzup_podio_core::webhook::normalize_payload;
//! use wazzup_podio_core::format::format_record;
//!
//! let payload = serde_json::json!({
//!     "messages": [{
//!         "messageId": "m1",
//!         "chatId": "79000000000",
//!         "chatType": "whatsapp",
//!         "type": "text",
//!         "text": "hi",
//!         "contact": { "name": "Ann" }
//!     }]
//! });
//!
//! let records = normalize_payload(&payload);
//! assert_eq!(records.len(), 1);
//! assert!(format_record(&records[0]).contains("**Ann**"));
//! ```

pub mod fields;
pub mod format;
pub mod outbound;
pub mod records;
pub mod reply;
pub mod webhook;

pub use fields::{ItemField, ItemFields};
pub use outbound::{CreatedItem, MessageSender, OutboundError, RecordStore};
pub use records::{
    CanonicalRecord, ChatType, ContactInfo, Direction, MessageRecord, MessageType, StatusKind,
    StatusRecord,
};
pub use reply::{extract_chat_id, forward_comment, normalize_chat_id, PodioComment, ReplyError};
pub use webhook::{
    normalize_payload, HmacSignatureValidator, NormalizationError, SignatureValidator,
};

/// Name recorded as the `source` of every item created in Podio.
pub const SOURCE_NAME: &str = "wazzup";

// ============================================================================
// Error Types
// ============================================================================

/// Validation errors for inbound requests and domain values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Field '{field}' is required")]
    Required { field: String },

    #[error("Field '{field}' has invalid format: {message}")]
    InvalidFormat { field: String, message: String },
}

#[cfg(test)]
mod test_support;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
