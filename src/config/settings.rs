use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub sender: SenderConfig,
    #[serde(default)]
    pub queue: QueueConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Shared secret protecting the trigger route. When absent, every trigger
/// request is rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiConfig {
    pub key: Option<String>,
}

/// Messaging provider credentials. The sender capability is only built when
/// account SID, auth token, and from-number are all present.
#[derive(Debug, Clone, Deserialize)]
pub struct SenderConfig {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub from_number: Option<String>,
    /// Provider-side content template used for registration messages
    #[serde(default = "default_template_sid")]
    pub template_sid: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueueConfig {
    #[serde(default = "default_queue_enabled")]
    pub enabled: bool,
    #[serde(default = "default_queue_backend")]
    pub backend: String,
    /// Maximum records handed to the batch processor per poll
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Enqueues fail once this many envelopes are waiting
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_template_sid() -> String {
    "HXbae39f90eb98c2550ec550a2b5f4d2a1".to_string()
}

fn default_queue_enabled() -> bool {
    true
}

fn default_queue_backend() -> String {
    "memory".to_string()
}

fn default_batch_size() -> usize {
    10
}

fn default_poll_interval() -> u64 {
    5
}

fn default_max_depth() -> usize {
    10_000
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("queue.enabled", true)?
            .set_default("queue.backend", "memory")?
            .set_default("queue.batch_size", 10)?
            .set_default("queue.poll_interval_seconds", 5)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables
            // SERVER_HOST, SERVER_PORT, API_KEY, SENDER_ACCOUNT_SID, etc.
            .add_source(Environment::default().separator("_").try_parsing(true));

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            account_sid: None,
            auth_token: None,
            from_number: None,
            template_sid: default_template_sid(),
        }
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            enabled: default_queue_enabled(),
            backend: default_queue_backend(),
            batch_size: default_batch_size(),
            poll_interval_seconds: default_poll_interval(),
            max_depth: default_max_depth(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let server = ServerConfig::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8080);

        let queue = QueueConfig::default();
        assert!(queue.enabled);
        assert_eq!(queue.backend, "memory");
        assert_eq!(queue.batch_size, 10);
    }

    #[test]
    fn test_sender_capability_absent_by_default() {
        let sender = SenderConfig::default();
        assert!(sender.account_sid.is_none());
        assert!(sender.auth_token.is_none());
        assert!(!sender.template_sid.is_empty());
    }
}
