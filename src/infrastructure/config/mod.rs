mod settings;

pub use settings::{
    LoggingConfig, MailerConfig, OtelConfig, RedisConfig, ServerConfig, Settings, SiteConfig,
    StorageConfig,
};
