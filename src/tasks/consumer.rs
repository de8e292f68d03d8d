use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use crate::config::QueueConfig;
use crate::dispatch::{Dispatcher, InvocationEnvelope};
use crate::queue::WebhookQueue;

/// Background task that drains the webhook queue in bounded batches and
/// feeds them back through the dispatcher as queue-batch invocations.
pub struct QueueConsumerTask {
    config: QueueConfig,
    queue: Arc<dyn WebhookQueue>,
    dispatcher: Arc<Dispatcher>,
    shutdown: broadcast::Receiver<()>,
}

impl QueueConsumerTask {
    pub fn new(
        config: QueueConfig,
        queue: Arc<dyn WebhookQueue>,
        dispatcher: Arc<Dispatcher>,
        shutdown: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            config,
            queue,
            dispatcher,
            shutdown,
        }
    }

    /// Run the consumer loop until shutdown
    pub async fn run(mut self) {
        let mut poll_timer =
            tokio::time::interval(Duration::from_secs(self.config.poll_interval_seconds));

        // Skip immediate first tick
        poll_timer.tick().await;

        tracing::info!(
            poll_interval_secs = self.config.poll_interval_seconds,
            batch_size = self.config.batch_size,
            "Queue consumer task started"
        );

        loop {
            tokio::select! {
                _ = self.shutdown.recv() => {
                    tracing::info!("Queue consumer task received shutdown signal");
                    break;
                }
                _ = poll_timer.tick() => {
                    self.drain_once().await;
                }
            }
        }

        tracing::info!("Queue consumer task stopped");
    }

    async fn drain_once(&self) {
        let records = match self.queue.receive(self.config.batch_size).await {
            Ok(records) => records,
            Err(error) => {
                tracing::error!(error = %error, "Failed to receive queued webhooks");
                return;
            }
        };

        if records.is_empty() {
            return;
        }

        let envelope = InvocationEnvelope {
            records,
            ..Default::default()
        };
        let result = self.dispatcher.dispatch(envelope).await;

        tracing::debug!(
            status = result.status_code,
            "Queued webhook batch dispatched"
        );
    }
}
