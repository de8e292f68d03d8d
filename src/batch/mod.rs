//! Batch processing of queued webhook envelopes.
//!
//! The queue delivers webhook invocations in bounded batches with
//! at-least-once semantics. Each record is unwrapped to the original
//! invocation and run through the webhook handler under the identity it was
//! enqueued with; one bad record never aborts its siblings. The batch
//! itself always resolves to a single 200 carrying processed/failed counts
//! — redelivery of genuinely failed items is the queue's job.

use thiserror::Error;

use crate::dispatch::{DispatchResult, QueueEnvelope, QueueRecord, RequestId, ResponseBody};
use crate::metrics;
use crate::webhook;

#[derive(Debug, Error)]
enum RecordError {
    #[error("invalid queue envelope: {0}")]
    Envelope(#[from] serde_json::Error),

    #[error("webhook handler returned status {0}")]
    Handler(u16),
}

/// Process one batch of queue records under the batch's own request id.
pub fn process_batch(records: &[QueueRecord], request_id: &RequestId) -> DispatchResult {
    tracing::info!(
        request_id = %request_id,
        record_count = records.len(),
        "Processing queued webhook batch"
    );

    let mut processed = 0usize;
    let mut errors = 0usize;

    for record in records {
        match process_record(record) {
            Ok(()) => processed += 1,
            Err(error) => {
                errors += 1;
                tracing::error!(
                    request_id = %request_id,
                    message_id = %record.message_id,
                    error = %error,
                    "Error processing queued record"
                );
            }
        }
    }

    metrics::BATCH_RECORDS_PROCESSED_TOTAL.inc_by(processed as u64);
    metrics::BATCH_RECORDS_FAILED_TOTAL.inc_by(errors as u64);

    tracing::info!(
        request_id = %request_id,
        processed = processed,
        errors = errors,
        "Completed queued webhook batch"
    );

    DispatchResult {
        status_code: 200,
        body: ResponseBody {
            processed: Some(processed),
            errors: Some(errors),
            ..ResponseBody::new(
                format!("Processed {} messages with {} errors", processed, errors),
                request_id,
            )
        },
    }
}

fn process_record(record: &QueueRecord) -> Result<(), RecordError> {
    let envelope: QueueEnvelope = serde_json::from_str(&record.body)?;

    // Each item carries the identity it was enqueued under, which may
    // differ from the batch-level one
    let item_id = envelope
        .request_id
        .map(RequestId::from)
        .unwrap_or_else(RequestId::unknown);

    tracing::info!(request_id = %item_id, "Processing queued webhook");

    let result = webhook::handle_webhook(envelope.event.raw_body(), &item_id);
    if result.is_success() {
        Ok(())
    } else {
        Err(RecordError::Handler(result.status_code))
    }
}
