//! Application configuration loaded from environment variables and config files.
//!
//! Supports `.env` files for development and environment variables for production.
//! Config precedence: env vars > .env file > config.toml > defaults

use serde::Deserialize;
use std::sync::OnceLock;
use std::time::Duration;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Initialize the global configuration from environment.
///
/// Should be called once at application startup. Later calls return the
/// configuration loaded by the first one.
pub fn init() -> Result<&'static AppConfig, config::ConfigError> {
    // Load .env file if present (development)
    let _ = dotenvy::dotenv();

    let app_config = load(config::File::with_name("config").required(false))?;
    Ok(CONFIG.get_or_init(|| app_config))
}

/// Build a configuration from defaults, the given file source, and `TANDEM__*` env vars.
pub fn load<S>(file: S) -> Result<AppConfig, config::ConfigError>
where
    S: config::Source + Send + Sync + 'static,
{
    let cfg = config::Config::builder()
        // Defaults
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3000)?
        .set_default("signaling.retention_secs", 30)?
        .set_default("signaling.max_envelopes", 1000)?
        .set_default("signaling.poll_interval_ms", 500)?
        .set_default("chat.max_messages", 100)?
        .set_default("chat.typing_ttl_ms", 3000)?
        .set_default("chat.max_message_length", 2000)?
        .add_source(file)
        // Environment variables (TANDEM__SERVER__PORT, TANDEM__REDIS__URL, etc.)
        .add_source(
            config::Environment::with_prefix("TANDEM")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    cfg.try_deserialize()
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub signaling: SignalingConfig,
    pub chat: ChatConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    #[serde(default)]
    pub join: JoinConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SignalingConfig {
    /// Envelopes older than this are evicted on the next store access.
    pub retention_secs: u64,
    /// Hard cap on buffered envelopes; the oldest are dropped past it.
    pub max_envelopes: usize,
    /// Poll cadence clients are expected to use.
    pub poll_interval_ms: u64,
}

impl SignalingConfig {
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatConfig {
    pub max_messages: usize,
    pub typing_ttl_ms: u64,
    pub max_message_length: usize,
}

impl ChatConfig {
    pub fn typing_ttl(&self) -> Duration {
        Duration::from_millis(self.typing_ttl_ms)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RedisConfig {
    /// Redis connection URL. Omit to keep chat history in-process.
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct JoinConfig {
    /// Shared password for the join gate. Omit to leave the gate open.
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_sources() {
        let cfg = load(config::File::from_str("", config::FileFormat::Toml)).unwrap();
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.signaling.retention(), Duration::from_secs(30));
        assert_eq!(cfg.signaling.max_envelopes, 1000);
        assert_eq!(cfg.chat.max_messages, 100);
        assert_eq!(cfg.chat.typing_ttl(), Duration::from_secs(3));
        assert!(cfg.redis.url.is_none());
        assert!(cfg.join.password.is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let toml = r#"
            [signaling]
            retention_secs = 5

            [join]
            password = "letmein"
        "#;
        let cfg = load(config::File::from_str(toml, config::FileFormat::Toml)).unwrap();
        assert_eq!(cfg.signaling.retention_secs, 5);
        assert_eq!(cfg.signaling.poll_interval_ms, 500);
        assert_eq!(cfg.join.password.as_deref(), Some("letmein"));
    }
}
