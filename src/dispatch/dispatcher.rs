use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::batch;
use crate::config::Settings;
use crate::error::DispatchError;
use crate::metrics;
use crate::queue::WebhookQueue;
use crate::registration;
use crate::sender::{MessageSender, SenderError};
use crate::webhook;

use super::{DispatchResult, InvocationEnvelope, QueueEnvelope, RequestId};

/// Route segments matched against the resolved invocation path
const TRIGGER_ROUTE: &str = "/trigger";
const WEBHOOK_ROUTE: &str = "/webhook";

#[derive(Debug, Default)]
struct DispatcherStats {
    triggers: AtomicU64,
    webhooks_queued: AtomicU64,
    webhooks_direct: AtomicU64,
    batches: AtomicU64,
    forbidden: AtomicU64,
    not_found: AtomicU64,
}

/// Snapshot of dispatcher statistics
#[derive(Debug, Clone, Serialize)]
pub struct DispatcherStatsSnapshot {
    pub triggers: u64,
    pub webhooks_queued: u64,
    pub webhooks_direct: u64,
    pub batches: u64,
    pub forbidden: u64,
    pub not_found: u64,
}

/// Entry point of the pipeline. Classifies each invocation and routes it to
/// the batch, trigger, or webhook path. Stateless between invocations; the
/// capabilities it holds are resolved once at startup.
///
/// `dispatch` is total: every internal failure is converted into a
/// `DispatchResult` carrying the correlation id, nothing escapes.
pub struct Dispatcher {
    api_key: Option<String>,
    template_sid: String,
    sender: Option<Arc<dyn MessageSender>>,
    queue: Option<Arc<dyn WebhookQueue>>,
    stats: DispatcherStats,
}

impl Dispatcher {
    pub fn new(
        settings: &Settings,
        sender: Option<Arc<dyn MessageSender>>,
        queue: Option<Arc<dyn WebhookQueue>>,
    ) -> Self {
        Self {
            api_key: settings.api.key.clone(),
            template_sid: settings.sender.template_sid.clone(),
            sender,
            queue,
            stats: DispatcherStats::default(),
        }
    }

    pub fn stats(&self) -> DispatcherStatsSnapshot {
        DispatcherStatsSnapshot {
            triggers: self.stats.triggers.load(Ordering::Relaxed),
            webhooks_queued: self.stats.webhooks_queued.load(Ordering::Relaxed),
            webhooks_direct: self.stats.webhooks_direct.load(Ordering::Relaxed),
            batches: self.stats.batches.load(Ordering::Relaxed),
            forbidden: self.stats.forbidden.load(Ordering::Relaxed),
            not_found: self.stats.not_found.load(Ordering::Relaxed),
        }
    }

    pub async fn dispatch(&self, envelope: InvocationEnvelope) -> DispatchResult {
        let request_id = RequestId::generate();
        tracing::debug!(request_id = %request_id, envelope = ?envelope, "Received invocation");

        // Queue batches take precedence over path-based routing
        if envelope.is_queue_batch() {
            tracing::info!(
                request_id = %request_id,
                record_count = envelope.records.len(),
                "Classified invocation as queue batch"
            );
            self.stats.batches.fetch_add(1, Ordering::Relaxed);
            metrics::INVOCATIONS_TOTAL.with_label_values(&["batch"]).inc();
            return batch::process_batch(&envelope.records, &request_id);
        }

        let path = envelope.resolved_path().to_string();
        tracing::info!(request_id = %request_id, path = %path, "Resolved invocation path");

        if path.contains(TRIGGER_ROUTE) {
            tracing::info!(request_id = %request_id, "Classified invocation as trigger request");
            metrics::INVOCATIONS_TOTAL.with_label_values(&["trigger"]).inc();
            return self.dispatch_trigger(&envelope, &request_id).await;
        }

        if path.contains(WEBHOOK_ROUTE) {
            tracing::info!(request_id = %request_id, "Classified invocation as webhook request");
            metrics::INVOCATIONS_TOTAL.with_label_values(&["webhook"]).inc();
            return self.dispatch_webhook(envelope, &request_id).await;
        }

        tracing::error!(request_id = %request_id, path = %path, "Route not found");
        self.stats.not_found.fetch_add(1, Ordering::Relaxed);
        metrics::INVOCATIONS_TOTAL.with_label_values(&["not_found"]).inc();
        DispatchResult::not_found(&request_id)
    }

    async fn dispatch_trigger(
        &self,
        envelope: &InvocationEnvelope,
        request_id: &RequestId,
    ) -> DispatchResult {
        // Header name lookup is case-insensitive (covers the historical
        // x-api-key / X-Api-Key client spellings); the value comparison is
        // exact. An unconfigured key rejects everything.
        let presented = envelope.header("x-api-key");
        let authorized = matches!(
            (&self.api_key, presented),
            (Some(expected), Some(key)) if key == expected.as_str()
        );

        if !authorized {
            // generic rejection; neither the expected nor presented value
            // may surface
            tracing::warn!(
                request_id = %request_id,
                "Rejected trigger request with invalid or missing API key"
            );
            self.stats.forbidden.fetch_add(1, Ordering::Relaxed);
            return DispatchResult::forbidden(request_id);
        }

        let Some(sender) = &self.sender else {
            let error = DispatchError::Sender(SenderError::NotConfigured);
            tracing::error!(request_id = %request_id, error = %error, "Trigger path unavailable");
            return DispatchResult::from_error(
                "Error processing registration request",
                &error,
                request_id,
            );
        };

        self.stats.triggers.fetch_add(1, Ordering::Relaxed);
        registration::handle_trigger(
            envelope.raw_body(),
            request_id,
            sender.as_ref(),
            &self.template_sid,
        )
        .await
    }

    async fn dispatch_webhook(
        &self,
        envelope: InvocationEnvelope,
        request_id: &RequestId,
    ) -> DispatchResult {
        let Some(queue) = &self.queue else {
            tracing::warn!(
                request_id = %request_id,
                "Webhook queue not configured, processing webhook directly"
            );
            self.stats.webhooks_direct.fetch_add(1, Ordering::Relaxed);
            return webhook::handle_webhook(envelope.raw_body(), request_id);
        };

        let queued = QueueEnvelope::new(envelope, request_id);
        match queue.enqueue(queued).await {
            Ok(()) => {
                tracing::info!(request_id = %request_id, "Webhook queued for processing");
                self.stats.webhooks_queued.fetch_add(1, Ordering::Relaxed);
                DispatchResult::ok("Webhook received and queued for processing", request_id)
            }
            Err(error) => {
                let error = DispatchError::Queue(error);
                tracing::error!(
                    request_id = %request_id,
                    error = %error,
                    "Error queuing webhook"
                );
                DispatchResult::from_error("Error processing webhook", &error, request_id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Settings;

    use super::*;

    fn settings() -> Settings {
        Settings {
            server: Default::default(),
            api: crate::config::ApiConfig {
                key: Some("test-key".to_string()),
            },
            sender: Default::default(),
            queue: Default::default(),
        }
    }

    #[tokio::test]
    async fn test_unmatched_path_is_not_found() {
        let dispatcher = Dispatcher::new(&settings(), None, None);
        let envelope = InvocationEnvelope {
            raw_path: Some("/somewhere/else".to_string()),
            ..Default::default()
        };

        let result = dispatcher.dispatch(envelope).await;
        assert_eq!(result.status_code, 404);
        assert_eq!(result.body.message, "Route not found");
        assert_eq!(dispatcher.stats().not_found, 1);
    }

    #[tokio::test]
    async fn test_trigger_without_configured_key_is_forbidden() {
        let unkeyed = Settings {
            api: crate::config::ApiConfig { key: None },
            ..settings()
        };
        let dispatcher = Dispatcher::new(&unkeyed, None, None);
        let envelope = InvocationEnvelope {
            raw_path: Some("/trigger".to_string()),
            headers: [("x-api-key".to_string(), "anything".to_string())].into(),
            ..Default::default()
        };

        let result = dispatcher.dispatch(envelope).await;
        assert_eq!(result.status_code, 403);
        assert_eq!(dispatcher.stats().forbidden, 1);
    }

    #[tokio::test]
    async fn test_authorized_trigger_without_sender_is_a_dependency_error() {
        let dispatcher = Dispatcher::new(&settings(), None, None);
        let envelope = InvocationEnvelope {
            raw_path: Some("/trigger".to_string()),
            headers: [("x-api-key".to_string(), "test-key".to_string())].into(),
            body: Some("{}".to_string()),
            ..Default::default()
        };

        let result = dispatcher.dispatch(envelope).await;
        assert_eq!(result.status_code, 500);
        assert!(result
            .body
            .error
            .as_deref()
            .is_some_and(|e| e.contains("not configured")));
    }
}
