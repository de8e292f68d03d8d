//! Inbound provider callbacks.
//!
//! The messaging provider posts a callback for delivery receipts and
//! replies. Current scope is acknowledge-only: the callback is parsed, the
//! provider message SID is logged for traceability, and a 200 is returned.
//! No deduplication is performed against previously seen SIDs.

use serde::Deserialize;

use crate::dispatch::{DispatchResult, RequestId};
use crate::error::DispatchError;

/// Provider callback payload. Field names follow the provider's PascalCase
/// convention; everything is optional on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderCallback {
    #[serde(rename = "MessageSid")]
    pub message_sid: String,
    #[serde(rename = "MessageStatus")]
    pub message_status: Option<String>,
    #[serde(rename = "From")]
    pub from: Option<String>,
    #[serde(rename = "Body")]
    pub body: Option<String>,
}

impl ProviderCallback {
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

/// Handle a provider callback. Always acknowledges a parseable body with a
/// 200; a parse failure is a 500 carrying the error text. Makes no
/// outbound call.
pub fn handle_webhook(raw_body: &str, request_id: &RequestId) -> DispatchResult {
    match ProviderCallback::parse(raw_body) {
        Ok(callback) => {
            // SID is logged but not stored; duplicate callbacks are each
            // acknowledged independently
            tracing::info!(
                request_id = %request_id,
                message_sid = %callback.message_sid,
                message_status = callback.message_status.as_deref().unwrap_or(""),
                "Processing provider callback"
            );
            DispatchResult::ok("Webhook processed successfully", request_id)
        }
        Err(error) => {
            let error = DispatchError::PayloadParse(error);
            tracing::error!(
                request_id = %request_id,
                error = %error,
                "Error handling webhook callback"
            );
            DispatchResult::from_error("Error processing webhook", &error, request_id)
        }
    }
}
