//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, BlogConfig, ConfigError, ContentFilterConfig, CorsConfig,
    DatabaseConfig, Environment, GeoConfig, JwtConfig, NotificationConfig, RateLimitConfig,
    RedisConfig, ServerConfig,
};
