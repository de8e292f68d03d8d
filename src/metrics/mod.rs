//! Prometheus metrics for the dispatch service:
//! - invocation counts by classified route
//! - trigger send outcomes
//! - queue and batch throughput

use lazy_static::lazy_static;
use prometheus::{
    register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec,
    TextEncoder,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "clubreg";

lazy_static! {
    /// Total invocations dispatched, labeled by classified route
    pub static ref INVOCATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_invocations_total", METRIC_PREFIX),
        "Total invocations dispatched, by route",
        &["route"]
    ).unwrap();

    /// Registration messages handed to the provider successfully
    pub static ref TRIGGER_MESSAGES_SENT_TOTAL: IntCounter = register_int_counter!(
        format!("{}_trigger_messages_sent_total", METRIC_PREFIX),
        "Total registration messages sent"
    ).unwrap();

    /// Trigger requests that failed at the provider boundary
    pub static ref TRIGGER_SEND_FAILURES_TOTAL: IntCounter = register_int_counter!(
        format!("{}_trigger_send_failures_total", METRIC_PREFIX),
        "Total registration message send failures"
    ).unwrap();

    /// Webhook envelopes accepted by the queue
    pub static ref WEBHOOKS_QUEUED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_webhooks_queued_total", METRIC_PREFIX),
        "Total webhook envelopes enqueued"
    ).unwrap();

    /// Queued records processed successfully in batches
    pub static ref BATCH_RECORDS_PROCESSED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_batch_records_processed_total", METRIC_PREFIX),
        "Total queued records processed successfully"
    ).unwrap();

    /// Queued records that failed individually during batch processing
    pub static ref BATCH_RECORDS_FAILED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_batch_records_failed_total", METRIC_PREFIX),
        "Total queued records that failed processing"
    ).unwrap();
}

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_metrics_includes_prefix() {
        INVOCATIONS_TOTAL.with_label_values(&["trigger"]).inc();
        let output = encode_metrics().unwrap();
        assert!(output.contains("clubreg_invocations_total"));
    }
}
