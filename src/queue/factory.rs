//! Queue backend factory

use std::sync::Arc;

use crate::config::QueueConfig;

use super::memory_backend::MemoryQueueBackend;
use super::WebhookQueue;

/// Create a queue backend based on configuration.
///
/// Returns `None` when the queue is disabled — the dispatcher then runs the
/// webhook path in degraded direct-processing mode. An unrecognized backend
/// name falls back to memory with a warning.
pub fn create_queue_backend(config: &QueueConfig) -> Option<Arc<dyn WebhookQueue>> {
    if !config.enabled {
        tracing::warn!("Webhook queue disabled, callbacks will be processed inline");
        return None;
    }

    match config.backend.as_str() {
        "memory" => {
            tracing::info!(backend = "memory", "Creating memory queue backend");
            Some(Arc::new(MemoryQueueBackend::new(config.clone())))
        }
        other => {
            tracing::warn!(
                backend = %other,
                "Unknown queue backend requested, falling back to memory"
            );
            Some(Arc::new(MemoryQueueBackend::new(config.clone())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_queue_yields_no_backend() {
        let config = QueueConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(create_queue_backend(&config).is_none());
    }

    #[test]
    fn test_unknown_backend_falls_back_to_memory() {
        let config = QueueConfig {
            backend: "carrier-pigeon".to_string(),
            ..Default::default()
        };
        assert!(create_queue_backend(&config).is_some());
    }
}
