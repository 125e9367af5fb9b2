//! Service configuration for Parley.
//!
//! `ServiceConfig` is the top-level `parley.toml`. Every field has a
//! default so an empty (or absent) file yields a runnable configuration;
//! deploy-sensitive values can be overridden from the environment by the
//! loader in parley-api.

use secrecy::SecretString;
use serde::Deserialize;

/// Top-level configuration for the Parley service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default)]
    pub events: EventsConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// The socket address string to bind, e.g. `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// SQLite database location.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "parley.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl DatabaseConfig {
    /// The sqlx connection URL for the configured path.
    pub fn url(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.path)
    }
}

/// Inference backend settings.
#[derive(Debug, Clone, Deserialize)]
pub struct InferenceConfig {
    #[serde(default = "default_inference_url")]
    pub base_url: String,

    /// Bearer key for the backend. Never logged; absent means no auth header.
    #[serde(default)]
    pub api_key: Option<SecretString>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// How many stored turns of history accompany each new user turn.
    #[serde(default = "default_context_window")]
    pub context_window: usize,
}

fn default_inference_url() -> String {
    "http://127.0.0.1:9000".to_string()
}

fn default_model() -> String {
    "gpt-4".to_string()
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_context_window() -> usize {
    20
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: default_inference_url(),
            api_key: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            context_window: default_context_window(),
        }
    }
}

/// Event sink settings.
#[derive(Debug, Clone, Deserialize)]
pub struct EventsConfig {
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_channel_capacity() -> usize {
    1024
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

/// Logging and trace-export settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelemetryConfig {
    /// Emit logs as JSON lines instead of human-readable text.
    #[serde(default)]
    pub json_logs: bool,

    /// Bridge tracing spans to the OpenTelemetry stdout exporter.
    #[serde(default)]
    pub otel: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.server.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.database.path, "parley.db");
        assert_eq!(config.inference.context_window, 20);
        assert_eq!(config.inference.timeout_secs, 30);
        assert_eq!(config.inference.max_tokens, 2048);
        assert!(config.inference.api_key.is_none());
        assert_eq!(config.events.channel_capacity, 1024);
        assert!(!config.telemetry.json_logs);
    }

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config: ServiceConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.inference.model, "gpt-4");
    }

    #[test]
    fn test_partial_toml_overrides() {
        let toml_str = r#"
[server]
port = 3000

[inference]
base_url = "https://models.internal"
model = "sonnet"
context_window = 8

[telemetry]
json_logs = true
"#;
        let config: ServiceConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.inference.base_url, "https://models.internal");
        assert_eq!(config.inference.context_window, 8);
        assert_eq!(config.inference.max_tokens, 2048);
        assert!(config.telemetry.json_logs);
    }

    #[test]
    fn test_database_url() {
        let config = DatabaseConfig {
            path: "/var/lib/parley/parley.db".to_string(),
        };
        assert_eq!(config.url(), "sqlite:///var/lib/parley/parley.db?mode=rwc");
    }

    #[test]
    fn test_api_key_parses_without_leaking_in_debug() {
        let config: ServiceConfig = toml::from_str(
            r#"
[inference]
api_key = "sk-test-1234"
"#,
        )
        .unwrap();
        assert!(config.inference.api_key.is_some());
        let debug = format!("{:?}", config.inference);
        assert!(!debug.contains("sk-test-1234"));
    }
}
