//! # blog-common
//!
//! Shared utilities including configuration, error handling, token verification, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{Claims, JwtService};
pub use config::{
    AppConfig, AppSettings, BlogConfig, ConfigError, ContentFilterConfig, CorsConfig,
    DatabaseConfig, Environment, GeoConfig, JwtConfig, NotificationConfig, RateLimitConfig,
    RedisConfig, ServerConfig,
};
pub use error::{AppError, AppResult, INTERNAL_MESSAGE, UNAVAILABLE_MESSAGE};
pub use telemetry::{try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError};
