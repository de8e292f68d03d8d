mod consumer;

pub use consumer::QueueConsumerTask;
