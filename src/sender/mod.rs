//! Outbound messaging capability.
//!
//! The dispatch pipeline only depends on the [`MessageSender`] trait; the
//! production implementation is [`TwilioSender`], which talks to the
//! provider's REST API. Tests substitute scripted senders.

mod twilio;

use async_trait::async_trait;
use thiserror::Error;

use crate::registration::TemplateVariables;

pub use twilio::TwilioSender;

#[derive(Debug, Error)]
pub enum SenderError {
    #[error("message sender is not configured")]
    NotConfigured,

    #[error("request to messaging provider failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("messaging provider returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to encode template variables: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Capability for sending messages to a destination address. Returns the
/// provider-assigned message identifier on success.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send a templated message with positional content variables
    async fn send_template(
        &self,
        to: &str,
        template_sid: &str,
        variables: &TemplateVariables,
    ) -> Result<String, SenderError>;

    /// Send a free-text message
    async fn send_text(&self, to: &str, body: &str) -> Result<String, SenderError>;
}
