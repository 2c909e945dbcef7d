//! Reverse path: Podio comments forwarded back to the chat.
//!
//! A comment added in Podio is sent as a WhatsApp message. The target chat
//! is recovered from the comment itself; see [`extract_chat_id`].

use crate::outbound::{MessageSender, OutboundError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;
use tracing::{debug, info, instrument, warn};

/// Suffix WhatsApp chat ids carry in the Wazzup API
pub const WHATSAPP_SUFFIX: &str = "@c.us";

/// The parts of a Podio comment the reverse path needs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodioComment {
    /// Comment text
    pub value: String,
    pub external_id: Option<String>,
}

impl PodioComment {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            external_id: None,
        }
    }

    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    /// Read a comment out of a Podio hook body.
    ///
    /// Non-string values are treated as absent; numeric external ids are
    /// rendered as strings.
    pub fn from_json(value: &Value) -> Self {
        let text = value
            .get("value")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let external_id = match value.get("external_id") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        Self {
            value: text,
            external_id,
        }
    }
}

/// Errors on the reverse path
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplyError {
    #[error("Could not determine the chat id for the comment")]
    NoChatId,

    #[error("Failed to send message: {0}")]
    Send(#[from] OutboundError),
}

/// Append the WhatsApp suffix unless it is already present.
pub fn normalize_chat_id(chat_id: &str) -> String {
    if chat_id.ends_with(WHATSAPP_SUFFIX) {
        chat_id.to_string()
    } else {
        format!("{}{}", chat_id, WHATSAPP_SUFFIX)
    }
}

fn chat_id_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?i)chat_id:\s*(\d+)").ok())
        .as_ref()
}

/// Work out which chat a comment should be sent to.
///
/// Strategies, first match wins:
/// 1. an `external_id` containing `@c.us` (returned without the suffix,
///    skipped when nothing else remains),
/// 2. a `chat_id: <digits>` marker in the comment text,
/// 3. the configured fallback chat id.
///
/// # Errors
///
/// Returns [`ReplyError::NoChatId`] when no strategy applies.
pub fn extract_chat_id(
    comment: &PodioComment,
    fallback: Option<&str>,
) -> Result<String, ReplyError> {
    if let Some(external_id) = comment.external_id.as_deref() {
        if external_id.contains(WHATSAPP_SUFFIX) {
            let chat_id = external_id.replace(WHATSAPP_SUFFIX, "");
            if !chat_id.trim().is_empty() {
                debug!("Chat id taken from comment external id");
                return Ok(chat_id);
            }
        }
    }

    if let Some(captures) = chat_id_pattern().and_then(|re| re.captures(&comment.value)) {
        if let Some(id) = captures.get(1) {
            debug!("Chat id taken from comment text");
            return Ok(id.as_str().to_string());
        }
    }

    match fallback.filter(|f| !f.trim().is_empty()) {
        Some(fallback) => {
            warn!("Comment carries no chat id, using configured fallback");
            Ok(fallback.to_string())
        }
        None => Err(ReplyError::NoChatId),
    }
}

/// Forward a Podio comment to its chat.
///
/// Returns the messenger's response on success.
#[instrument(skip(sender, comment, fallback))]
pub async fn forward_comment(
    sender: &dyn MessageSender,
    comment: &PodioComment,
    fallback: Option<&str>,
) -> Result<Value, ReplyError> {
    let chat_id = extract_chat_id(comment, fallback)?;

    let result = sender.send_message(&chat_id, &comment.value).await?;
    info!(chat_id = %chat_id, "Forwarded Podio comment to chat");

    Ok(result)
}

#[cfg(test)]
#[path = "reply_tests.rs"]
mod tests;
