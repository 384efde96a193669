use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    #[serde(default)]
    pub mailer: MailerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub otel: OtelConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// Public website the generated email links point at.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Origin without trailing slash, e.g. `https://example.com`
    #[serde(default = "default_origin")]
    pub origin: String,
    /// Path of the logo image embedded in emails
    #[serde(default = "default_logo_path")]
    pub logo_path: String,
    /// Path of the "read more" target for update emails
    #[serde(default = "default_updates_path")]
    pub updates_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Collection store backend: "memory" or "redis"
    #[serde(default = "default_storage_backend")]
    pub backend: String,
    /// Key prefix for the Redis backend
    #[serde(default = "default_storage_prefix")]
    pub redis_prefix: String,
    /// Seed two example subscribers when the subscriber collection is absent
    #[serde(default = "default_true")]
    pub seed_examples: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    #[serde(default = "default_redis_url")]
    pub url: String,
    #[serde(default = "default_cb_failure_threshold")]
    pub circuit_breaker_failure_threshold: u32,
    #[serde(default = "default_cb_success_threshold")]
    pub circuit_breaker_success_threshold: u32,
    #[serde(default = "default_cb_reset_timeout")]
    pub circuit_breaker_reset_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailerConfig {
    /// Transport implementation; only "simulated" ships
    #[serde(default = "default_transport")]
    pub transport: String,
    /// Simulated per-send latency in milliseconds
    #[serde(default = "default_send_delay_ms")]
    pub send_delay_ms: u64,
    /// Probability that a simulated send succeeds (0.0-1.0)
    #[serde(default = "default_success_rate")]
    pub success_rate: f64,
    /// Pause between two sends of the same dispatch run
    #[serde(default = "default_inter_send_delay_ms")]
    pub inter_send_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "text" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OtelConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_otel_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

fn default_origin() -> String {
    "http://localhost:3000".to_string()
}

fn default_logo_path() -> String {
    "/innovia-logo.png".to_string()
}

fn default_updates_path() -> String {
    "/#progress-updates".to_string()
}

fn default_storage_backend() -> String {
    "memory".to_string()
}

fn default_storage_prefix() -> String {
    "mailer".to_string()
}

fn default_true() -> bool {
    true
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_cb_failure_threshold() -> u32 {
    5
}

fn default_cb_success_threshold() -> u32 {
    2
}

fn default_cb_reset_timeout() -> u64 {
    30
}

fn default_transport() -> String {
    "simulated".to_string()
}

fn default_send_delay_ms() -> u64 {
    1000
}

fn default_success_rate() -> f64 {
    0.95
}

fn default_inter_send_delay_ms() -> u64 {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_otel_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_service_name() -> String {
    "email-notification-service".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8081)?
            .set_default("site.origin", "http://localhost:3000")?
            .set_default("storage.backend", "memory")?
            .set_default("mailer.send_delay_ms", 1000)?
            .set_default("mailer.inter_send_delay_ms", 100)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // SERVER_PORT, SITE_ORIGIN, STORAGE_BACKEND, REDIS_URL; multi-word keys come from config files
            .add_source(
                Environment::default()
                    .separator("_")
                    .try_parsing(true)
                    .list_separator(","),
            );

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
            cors_origins: vec![],
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            logo_path: default_logo_path(),
            updates_path: default_updates_path(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            redis_prefix: default_storage_prefix(),
            seed_examples: true,
        }
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            circuit_breaker_failure_threshold: default_cb_failure_threshold(),
            circuit_breaker_success_threshold: default_cb_success_threshold(),
            circuit_breaker_reset_timeout_seconds: default_cb_reset_timeout(),
        }
    }
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            transport: default_transport(),
            send_delay_ms: default_send_delay_ms(),
            success_rate: default_success_rate(),
            inter_send_delay_ms: default_inter_send_delay_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for OtelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_otel_endpoint(),
            service_name: default_service_name(),
            sampling_ratio: default_sampling_ratio(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            site: SiteConfig::default(),
            storage: StorageConfig::default(),
            redis: RedisConfig::default(),
            mailer: MailerConfig::default(),
            logging: LoggingConfig::default(),
            otel: OtelConfig::default(),
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
        assert_eq!(server.port, 8081);
    }

    #[test]
    fn test_mailer_defaults() {
        let mailer = MailerConfig::default();
        assert_eq!(mailer.transport, "simulated");
        assert_eq!(mailer.send_delay_ms, 1000);
        assert_eq!(mailer.inter_send_delay_ms, 100);
        assert!((mailer.success_rate - 0.95).abs() < f64::EPSILON);
    }

    #[test]
    fn test_storage_defaults() {
        let storage = StorageConfig::default();
        assert_eq!(storage.backend, "memory");
        assert!(storage.seed_examples);
    }

    #[test]
    fn test_server_addr() {
        let settings = Settings::default();
        assert_eq!(settings.server_addr(), "0.0.0.0:8081");
    }
}
