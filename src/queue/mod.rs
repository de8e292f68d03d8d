//! Webhook queue for decoupled callback processing.
//!
//! The dispatcher enqueues webhook invocations and acknowledges the
//! provider immediately; the consumer task drains the queue in bounded
//! batches. Delivery is at-least-once: a record received but not yet
//! processed when the process dies may be delivered again.

mod factory;
mod memory_backend;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::dispatch::{QueueEnvelope, QueueRecord};

pub use factory::create_queue_backend;
pub use memory_backend::MemoryQueueBackend;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("webhook queue is disabled")]
    Disabled,

    #[error("webhook queue is full (depth: {depth})")]
    Full { depth: usize },

    #[error("failed to encode queue envelope: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Capability for at-least-once, batched delivery of webhook envelopes.
#[async_trait]
pub trait WebhookQueue: Send + Sync {
    /// Append an envelope; short and bounded so the webhook caller is
    /// never kept waiting on downstream processing
    async fn enqueue(&self, envelope: QueueEnvelope) -> Result<(), QueueError>;

    /// Take up to `max_records` envelopes, wrapped as delivery records
    async fn receive(&self, max_records: usize) -> Result<Vec<QueueRecord>, QueueError>;

    /// Number of envelopes currently waiting
    async fn depth(&self) -> usize;

    async fn stats(&self) -> QueueStats;
}

/// Queue statistics exposed on the stats endpoint
#[derive(Debug, Clone, Serialize)]
pub struct QueueStats {
    pub backend_type: String,
    pub depth: usize,
    pub enqueued_total: u64,
    pub received_total: u64,
}
