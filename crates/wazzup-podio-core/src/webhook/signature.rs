//! HMAC-SHA256 validation of inbound Wazzup webhooks.

use crate::ValidationError;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::{instrument, warn};

type HmacSha256 = Hmac<Sha256>;

/// Check a claimed signature against `HMAC-SHA256(secret, body)`.
///
/// The claimed value is the lowercase hex digest, optionally prefixed with
/// `sha256=`. The comparison runs in constant time.
///
/// An empty secret disables validation and always returns `true`.
pub fn verify_signature(secret: &str, body: &[u8], claimed: &str) -> bool {
    if secret.is_empty() {
        return true;
    }

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    let expected = hex::encode(mac.finalize().into_bytes());

    let claimed = claimed.trim();
    let claimed = claimed.strip_prefix("sha256=").unwrap_or(claimed);

    expected.as_bytes().ct_eq(claimed.as_bytes()).into()
}

/// Interface for validating webhook signatures
pub trait SignatureValidator: Send + Sync {
    /// Validate the signature header value for a raw request body.
    ///
    /// `signature` is `None` when the request carried no signature header.
    fn validate_signature(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> Result<(), ValidationError>;

    /// Whether signatures are actually checked
    fn is_enforced(&self) -> bool;
}

// ============================================================================
// HmacSignatureValidator
// ============================================================================

/// A [`SignatureValidator`] backed by the shared Wazzup webhook secret.
///
/// Constructed with an empty secret it accepts every request. A `WARN` line
/// is emitted once at construction in that case so that operators notice
/// that inbound webhooks are unauthenticated.
///
/// # Examples
///
/// ```rust
/// use wazzup_podio_core::webhook::{HmacSignatureValidator, SignatureValidator};
///
/// let validator = HmacSignatureValidator::new("");
/// assert!(!validator.is_enforced());
/// assert!(validator.validate_signature(b"{}", None).is_ok());
/// ```
pub struct HmacSignatureValidator {
    secret: Option<String>,
}

impl HmacSignatureValidator {
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        if secret.is_empty() {
            warn!("Wazzup webhook secret is not configured, signature validation is disabled");
            return Self { secret: None };
        }
        Self {
            secret: Some(secret),
        }
    }
}

impl std::fmt::Debug for HmacSignatureValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let secret = if self.secret.is_some() {
            "<REDACTED>"
        } else {
            "<NONE>"
        };
        f.debug_struct("HmacSignatureValidator")
            .field("secret", &secret)
            .finish()
    }
}

impl SignatureValidator for HmacSignatureValidator {
    /// # Errors
    ///
    /// Returns [`ValidationError::Required`] when a secret is configured and
    /// no signature was supplied.
    ///
    /// Returns [`ValidationError::InvalidFormat`] when the digest does not
    /// match.
    #[instrument(skip(self, payload, signature), fields(has_signature = signature.is_some()))]
    fn validate_signature(
        &self,
        payload: &[u8],
        signature: Option<&str>,
    ) -> Result<(), ValidationError> {
        let Some(secret) = self.secret.as_deref() else {
            return Ok(());
        };

        let signature = signature
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ValidationError::Required {
                field: super::SIGNATURE_HEADER.to_string(),
            })?;

        if verify_signature(secret, payload, signature) {
            Ok(())
        } else {
            Err(ValidationError::InvalidFormat {
                field: super::SIGNATURE_HEADER.to_string(),
                message: "HMAC-SHA256 digest does not match".to_string(),
            })
        }
    }

    fn is_enforced(&self) -> bool {
        self.secret.is_some()
    }
}

#[cfg(test)]
#[path = "signature_tests.rs"]
mod tests;
