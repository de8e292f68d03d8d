use crate::dispatch::{DispatchResult, RequestId, ResponseBody};
use crate::error::DispatchError;
use crate::metrics;
use crate::sender::MessageSender;

use super::{RegistrationPayload, TemplateVariables};

/// Handle a trigger request: parse the registration payload, build the
/// template variables, and send the outbound message. Synchronous and
/// caller-facing; a sender failure is returned as a 500, never retried.
pub async fn handle_trigger(
    raw_body: &str,
    request_id: &RequestId,
    sender: &dyn MessageSender,
    template_sid: &str,
) -> DispatchResult {
    match run(raw_body, request_id, sender, template_sid).await {
        Ok(result) => result,
        Err(error) => {
            if matches!(error, DispatchError::Sender(_)) {
                metrics::TRIGGER_SEND_FAILURES_TOTAL.inc();
            }
            tracing::error!(
                request_id = %request_id,
                error = %error,
                "Error handling trigger request"
            );
            DispatchResult::from_error("Error processing registration request", &error, request_id)
        }
    }
}

async fn run(
    raw_body: &str,
    request_id: &RequestId,
    sender: &dyn MessageSender,
    template_sid: &str,
) -> Result<DispatchResult, DispatchError> {
    let payload = RegistrationPayload::parse(raw_body)?;

    let player = payload.player_full_name();
    let parent = payload.parent_full_name();
    tracing::info!(
        request_id = %request_id,
        player = %player,
        parent = %parent,
        phone = %payload.parent_tel(),
        team = %payload.team_label(),
        "Processing registration"
    );

    let variables = TemplateVariables::from_registration(&payload);
    let message_sid = sender
        .send_template(payload.parent_tel(), template_sid, &variables)
        .await?;

    metrics::TRIGGER_MESSAGES_SENT_TOTAL.inc();
    tracing::info!(
        request_id = %request_id,
        message_sid = %message_sid,
        "Registration message sent"
    );

    Ok(DispatchResult {
        status_code: 200,
        body: ResponseBody {
            player: Some(player),
            parent: Some(parent),
            team: Some(payload.team_label()),
            status: Some("message_sent".to_string()),
            message_sid: Some(message_sid),
            ..ResponseBody::new("Registration data received successfully", request_id)
        },
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::sender::SenderError;

    use super::*;

    #[derive(Default)]
    struct RecordingSender {
        fail: bool,
        sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl MessageSender for RecordingSender {
        async fn send_template(
            &self,
            to: &str,
            template_sid: &str,
            _variables: &TemplateVariables,
        ) -> Result<String, SenderError> {
            if self.fail {
                return Err(SenderError::Api {
                    status: 400,
                    body: "template rejected".to_string(),
                });
            }
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), template_sid.to_string()));
            Ok("SM00000001".to_string())
        }

        async fn send_text(&self, _to: &str, _body: &str) -> Result<String, SenderError> {
            Ok("SM00000002".to_string())
        }
    }

    #[tokio::test]
    async fn test_successful_trigger_reports_message_sent() {
        let sender = RecordingSender::default();
        let request_id = RequestId::generate();
        let result = handle_trigger(
            r#"{"player_first_name":"Seb","parent_tel":"+447700900000"}"#,
            &request_id,
            &sender,
            "HX123",
        )
        .await;

        assert_eq!(result.status_code, 200);
        assert_eq!(result.body.status.as_deref(), Some("message_sent"));
        assert_eq!(result.body.message_sid.as_deref(), Some("SM00000001"));
        assert_eq!(result.body.player.as_deref(), Some("Seb"));

        let sent = sender.sent.lock().unwrap();
        assert_eq!(sent.as_slice(), &[("+447700900000".to_string(), "HX123".to_string())]);
    }

    #[tokio::test]
    async fn test_sender_failure_is_a_500_without_sid() {
        let sender = RecordingSender {
            fail: true,
            ..Default::default()
        };
        let request_id = RequestId::generate();
        let result = handle_trigger("{}", &request_id, &sender, "HX123").await;

        assert_eq!(result.status_code, 500);
        assert!(result.body.message_sid.is_none());
        assert!(result.body.error.as_deref().is_some_and(|e| !e.is_empty()));
        assert_eq!(result.body.request_id, request_id.to_string());
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_500_with_parse_error() {
        let sender = RecordingSender::default();
        let request_id = RequestId::generate();
        let result = handle_trigger("not json", &request_id, &sender, "HX123").await;

        assert_eq!(result.status_code, 500);
        assert!(result.body.error.is_some());
        assert!(sender.sent.lock().unwrap().is_empty());
    }
}
