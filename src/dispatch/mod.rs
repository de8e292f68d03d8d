//! Event classification and dispatch.
//!
//! An [`InvocationEnvelope`] is the raw inbound invocation — an HTTP request
//! captured by the transport, or a batch of queue records replayed by the
//! consumer task. The [`Dispatcher`] classifies each envelope and routes it
//! to the trigger, webhook, or batch path, always producing a
//! [`DispatchResult`] carrying the invocation's correlation id.

mod dispatcher;
mod envelope;
mod identity;
mod result;

pub use dispatcher::{Dispatcher, DispatcherStatsSnapshot};
pub use envelope::{
    HttpContext, InvocationEnvelope, QueueEnvelope, QueueRecord, RequestContext,
    QUEUE_EVENT_SOURCE,
};
pub use identity::RequestId;
pub use result::{DispatchResult, ResponseBody};
