//! # Webhook Processing Module
//!
//! Handles Wazzup webhook signature validation and payload normalization.
//!
//! The HTTP layer hands this module the raw body bytes (for the signature)
//! and the parsed JSON value (for normalization). Both steps are pure; no
//! network access happens here.

mod normalizer;
mod signature;

pub use normalizer::{normalize_payload, parse_message, parse_status};
pub use signature::{verify_signature, HmacSignatureValidator, SignatureValidator};

/// Header carrying the Wazzup HMAC-SHA256 signature
pub const SIGNATURE_HEADER: &str = "X-Wazzup-Signature";

// ============================================================================
// Error Types
// ============================================================================

/// Reasons a single webhook entry could not be normalized
///
/// These never abort a batch: the offending entry is logged and skipped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizationError {
    #[error("Entry is not a JSON object")]
    NotAnObject,

    #[error("Invalid field type: {field} - expected {expected}")]
    InvalidFieldType {
        field: String,
        expected: &'static str,
    },
}

impl NormalizationError {
    pub(crate) fn invalid_type(field: &str, expected: &'static str) -> Self {
        Self::InvalidFieldType {
            field: field.to_string(),
            expected,
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
