//! In-memory webhook queue backend.
//!
//! Envelopes are held in a process-local FIFO and lost on restart. Suitable
//! for single-instance deployments and tests; a durable backend would slot
//! in behind the same trait.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::QueueConfig;
use crate::dispatch::{QueueEnvelope, QueueRecord, QUEUE_EVENT_SOURCE};
use crate::metrics;

use super::{QueueError, QueueStats, WebhookQueue};

pub struct MemoryQueueBackend {
    queue: Mutex<VecDeque<QueueEnvelope>>,
    config: QueueConfig,
    enqueued: AtomicU64,
    received: AtomicU64,
}

impl MemoryQueueBackend {
    pub fn new(config: QueueConfig) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            config,
            enqueued: AtomicU64::new(0),
            received: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl WebhookQueue for MemoryQueueBackend {
    async fn enqueue(&self, envelope: QueueEnvelope) -> Result<(), QueueError> {
        if !self.config.enabled {
            return Err(QueueError::Disabled);
        }

        let mut queue = self.queue.lock().await;

        // A full queue fails the enqueue rather than dropping envelopes;
        // the provider's retry is the backstop
        if queue.len() >= self.config.max_depth {
            return Err(QueueError::Full { depth: queue.len() });
        }

        queue.push_back(envelope);
        self.enqueued.fetch_add(1, Ordering::Relaxed);
        metrics::WEBHOOKS_QUEUED_TOTAL.inc();

        tracing::debug!(depth = queue.len(), "Webhook envelope enqueued");
        Ok(())
    }

    async fn receive(&self, max_records: usize) -> Result<Vec<QueueRecord>, QueueError> {
        let mut queue = self.queue.lock().await;
        let count = queue.len().min(max_records);

        let mut records = Vec::with_capacity(count);
        for envelope in queue.drain(..count) {
            records.push(QueueRecord {
                message_id: Uuid::new_v4().to_string(),
                event_source: QUEUE_EVENT_SOURCE.to_string(),
                body: serde_json::to_string(&envelope)?,
            });
        }

        if !records.is_empty() {
            self.received
                .fetch_add(records.len() as u64, Ordering::Relaxed);
            tracing::debug!(
                record_count = records.len(),
                remaining = queue.len(),
                "Drained webhook envelopes"
            );
        }

        Ok(records)
    }

    async fn depth(&self) -> usize {
        self.queue.lock().await.len()
    }

    async fn stats(&self) -> QueueStats {
        QueueStats {
            backend_type: "memory".to_string(),
            depth: self.queue.lock().await.len(),
            enqueued_total: self.enqueued.load(Ordering::Relaxed),
            received_total: self.received.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio_test::assert_ok;

    use crate::dispatch::{InvocationEnvelope, RequestId};

    use super::*;

    fn enabled_config() -> QueueConfig {
        QueueConfig {
            enabled: true,
            max_depth: 10,
            ..Default::default()
        }
    }

    fn envelope(body: &str) -> QueueEnvelope {
        QueueEnvelope::new(
            InvocationEnvelope {
                body: Some(body.to_string()),
                ..Default::default()
            },
            &RequestId::generate(),
        )
    }

    #[tokio::test]
    async fn test_enqueue_when_disabled() {
        let config = QueueConfig {
            enabled: false,
            ..Default::default()
        };
        let backend = MemoryQueueBackend::new(config);

        let result = backend.enqueue(envelope("{}")).await;
        assert!(matches!(result, Err(QueueError::Disabled)));
    }

    #[tokio::test]
    async fn test_enqueue_and_receive_fifo() {
        let backend = MemoryQueueBackend::new(enabled_config());

        assert_ok!(backend.enqueue(envelope(r#"{"MessageSid":"SM1"}"#)).await);
        assert_ok!(backend.enqueue(envelope(r#"{"MessageSid":"SM2"}"#)).await);
        assert_eq!(backend.depth().await, 2);

        let records = backend.receive(10).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].event_source, QUEUE_EVENT_SOURCE);
        assert!(records[0].body.contains("SM1"));
        assert!(records[1].body.contains("SM2"));
        assert_eq!(backend.depth().await, 0);
    }

    #[tokio::test]
    async fn test_receive_respects_batch_limit() {
        let backend = MemoryQueueBackend::new(enabled_config());

        for i in 0..5 {
            assert_ok!(backend.enqueue(envelope(&format!("{{\"n\":{}}}", i))).await);
        }

        let records = backend.receive(3).await.unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(backend.depth().await, 2);
    }

    #[tokio::test]
    async fn test_enqueue_fails_when_full() {
        let config = QueueConfig {
            enabled: true,
            max_depth: 2,
            ..Default::default()
        };
        let backend = MemoryQueueBackend::new(config);

        assert_ok!(backend.enqueue(envelope("{}")).await);
        assert_ok!(backend.enqueue(envelope("{}")).await);

        let result = backend.enqueue(envelope("{}")).await;
        assert!(matches!(result, Err(QueueError::Full { depth: 2 })));
    }

    #[tokio::test]
    async fn test_stats() {
        let backend = MemoryQueueBackend::new(enabled_config());

        assert_ok!(backend.enqueue(envelope("{}")).await);
        assert_ok!(backend.enqueue(envelope("{}")).await);
        let _ = backend.receive(1).await.unwrap();

        let stats = backend.stats().await;
        assert_eq!(stats.backend_type, "memory");
        assert_eq!(stats.depth, 1);
        assert_eq!(stats.enqueued_total, 2);
        assert_eq!(stats.received_total, 1);
    }
}
