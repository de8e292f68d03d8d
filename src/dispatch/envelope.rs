use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RequestId;

/// Declared origin stamped on records the webhook queue delivers. Batch
/// classification requires it; records from anywhere else are not ours.
pub const QUEUE_EVENT_SOURCE: &str = "clubreg:webhook-queue";

/// Raw inbound invocation. Constructed by the transport (or rebuilt from a
/// queued envelope), consumed once, never mutated.
///
/// The path may arrive in three historical shapes: the structured v2-style
/// `requestContext.http.path`, the flat `rawPath`, or the legacy flat
/// `path`. [`InvocationEnvelope::resolved_path`] applies that precedence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvocationEnvelope {
    #[serde(rename = "Records", skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<QueueRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_context: Option<RequestContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpContext>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpContext {
    pub path: String,
}

/// A single record delivered by the queue. `body` holds the JSON of the
/// [`QueueEnvelope`] that was enqueued.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueueRecord {
    pub message_id: String,
    pub event_source: String,
    pub body: String,
}

/// Wrapper placed on the queue for each webhook invocation: the original
/// envelope plus the identity and time it was enqueued under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueEnvelope {
    pub event: InvocationEnvelope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl InvocationEnvelope {
    /// Whether this invocation is a queue batch. Takes precedence over
    /// path-based routing.
    pub fn is_queue_batch(&self) -> bool {
        self.records
            .first()
            .is_some_and(|record| record.event_source == QUEUE_EVENT_SOURCE)
    }

    /// Resolve the request path: structured v2 context, then `rawPath`,
    /// then the legacy `path` field, defaulting to empty.
    pub fn resolved_path(&self) -> &str {
        if let Some(http) = self.request_context.as_ref().and_then(|ctx| ctx.http.as_ref()) {
            return &http.path;
        }
        if let Some(raw_path) = &self.raw_path {
            return raw_path;
        }
        self.path.as_deref().unwrap_or("")
    }

    /// Case-insensitive header lookup (covers historical client spellings
    /// like `x-api-key` and `X-Api-Key`). Value comparison is the caller's
    /// business and stays case-sensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Body as handed to the payload parsers; an absent body parses as an
    /// empty JSON object.
    pub fn raw_body(&self) -> &str {
        self.body.as_deref().unwrap_or("{}")
    }
}

impl QueueEnvelope {
    pub fn new(event: InvocationEnvelope, request_id: &RequestId) -> Self {
        Self {
            event,
            request_id: Some(request_id.to_string()),
            timestamp: Utc::now(),
        }
    }
}
