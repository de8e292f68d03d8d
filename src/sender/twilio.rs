//! Twilio WhatsApp sender.
//!
//! Messages are created with form-encoded POSTs to the account's Messages
//! resource, authenticated with basic auth. Destination and origin numbers
//! carry the `whatsapp:` address prefix; templated sends reference a
//! content SID plus JSON-encoded positional variables.

use serde::Deserialize;

use crate::config::SenderConfig;
use crate::registration::TemplateVariables;

use super::{MessageSender, SenderError};

const API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// Created-message resource, reduced to the field we use
#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
}

pub struct TwilioSender {
    client: reqwest::Client,
    endpoint: String,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

impl TwilioSender {
    /// Build a sender from configuration; absent credentials mean the
    /// capability is unavailable.
    pub fn from_config(config: &SenderConfig) -> Option<Self> {
        let account_sid = config.account_sid.clone()?;
        let auth_token = config.auth_token.clone()?;
        let from_number = config.from_number.clone()?;

        Some(Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/Accounts/{}/Messages.json", API_BASE, account_sid),
            account_sid,
            auth_token,
            from_number,
        })
    }

    async fn create_message(&self, params: &[(&str, &str)]) -> Result<String, SenderError> {
        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response body".to_string());
            return Err(SenderError::Api { status, body });
        }

        let created: MessageResource = response.json().await?;
        Ok(created.sid)
    }
}

#[async_trait::async_trait]
impl MessageSender for TwilioSender {
    async fn send_template(
        &self,
        to: &str,
        template_sid: &str,
        variables: &TemplateVariables,
    ) -> Result<String, SenderError> {
        let content_variables = variables.to_json()?;
        let to = format!("whatsapp:{}", to);
        let from = format!("whatsapp:{}", self.from_number);

        let params = [
            ("To", to.as_str()),
            ("From", from.as_str()),
            ("ContentSid", template_sid),
            ("ContentVariables", content_variables.as_str()),
        ];
        let sid = self.create_message(&params).await?;

        tracing::info!(to = %to, message_sid = %sid, "Template message sent");
        Ok(sid)
    }

    async fn send_text(&self, to: &str, body: &str) -> Result<String, SenderError> {
        let to = format!("whatsapp:{}", to);
        let from = format!("whatsapp:{}", self.from_number);

        let params = [
            ("To", to.as_str()),
            ("From", from.as_str()),
            ("Body", body),
        ];
        let sid = self.create_message(&params).await?;

        tracing::info!(to = %to, message_sid = %sid, "Text message sent");
        Ok(sid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_config() -> SenderConfig {
        SenderConfig {
            account_sid: Some("AC123".to_string()),
            auth_token: Some("token".to_string()),
            from_number: Some("+15550006789".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_sender_built_only_with_full_credentials() {
        assert!(TwilioSender::from_config(&full_config()).is_some());
        assert!(TwilioSender::from_config(&SenderConfig::default()).is_none());

        let partial = SenderConfig {
            auth_token: None,
            ..full_config()
        };
        assert!(TwilioSender::from_config(&partial).is_none());
    }

    #[test]
    fn test_endpoint_targets_account_messages_resource() {
        let sender = TwilioSender::from_config(&full_config()).unwrap();
        assert_eq!(
            sender.endpoint,
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
    }
}
