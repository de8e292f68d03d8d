mod settings;

pub use settings::{ApiConfig, QueueConfig, SenderConfig, ServerConfig, Settings};
