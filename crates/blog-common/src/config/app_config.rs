//! Application configuration structs
//!
//! Loads configuration from environment variables (and an optional `.env` file).

use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub blog: BlogConfig,
    pub notification: NotificationConfig,
    pub geo: GeoConfig,
    pub content: ContentFilterConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" | "dev" => Ok(Self::Development),
            other => Err(ConfigError::InvalidValue("APP_ENV", other.to_string())),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_redis_max_connections")]
    pub max_connections: u32,
    /// How long a command waits for a free connection before the store counts as down
    #[serde(default = "default_redis_wait_timeout_ms")]
    pub wait_timeout_ms: u64,
}

/// JWT verification configuration.
///
/// Tokens are minted by the account service; this backend only verifies them.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Blog identity settings
#[derive(Debug, Clone, Deserialize)]
pub struct BlogConfig {
    /// Public base URL used in notification deep links (no trailing slash)
    #[serde(default = "default_website_url")]
    pub website_url: String,
    /// The blog owner's user id; receives moderation reminders and may use admin routes
    #[serde(default = "default_admin_user_id")]
    pub admin_user_id: i64,
    /// How long the website configuration stays cached in Redis, in seconds
    #[serde(default = "default_config_cache_ttl")]
    pub config_cache_ttl: u64,
}

impl BlogConfig {
    #[must_use]
    pub fn config_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.config_cache_ttl)
    }
}

/// Background notification dispatch
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_notify_workers")]
    pub workers: usize,
    /// Pending jobs kept before the oldest is dropped
    #[serde(default = "default_notify_queue_capacity")]
    pub queue_capacity: usize,
    #[serde(default = "default_notify_exchange")]
    pub exchange: String,
    #[serde(default = "default_notify_routing_key")]
    pub routing_key: String,
}

/// IP geolocation lookups
#[derive(Debug, Clone, Deserialize)]
pub struct GeoConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// URL template, `{ip}` is replaced with the address
    #[serde(default = "default_geo_url")]
    pub url: String,
    #[serde(default = "default_geo_timeout_ms")]
    pub timeout_ms: u64,
}

impl GeoConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// User content filtering
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentFilterConfig {
    /// Newline separated list of words to mask
    #[serde(default)]
    pub sensitive_words_path: Option<PathBuf>,
}

// Default value functions
fn default_app_name() -> String {
    "blog-server".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_redis_max_connections() -> u32 {
    10
}

fn default_redis_wait_timeout_ms() -> u64 {
    500
}

fn default_access_token_expiry() -> i64 {
    86_400 // 1 day
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

fn default_website_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_admin_user_id() -> i64 {
    1
}

fn default_config_cache_ttl() -> u64 {
    3600
}

fn default_notify_workers() -> usize {
    2
}

fn default_notify_queue_capacity() -> usize {
    1024
}

fn default_notify_exchange() -> String {
    "email_exchange".to_string()
}

fn default_notify_routing_key() -> String {
    "email".to_string()
}

fn default_true() -> bool {
    true
}

fn default_geo_url() -> String {
    "http://ip-api.com/json/{ip}?lang=en".to_string()
}

fn default_geo_timeout_ms() -> u64 {
    1500
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from any key lookup (the environment, a map in tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(&lookup);

        Ok(Self {
            app: AppSettings {
                name: vars.string("APP_NAME", default_app_name),
                env: vars.parsed_or("APP_ENV", Environment::default)?,
            },
            api: ServerConfig {
                host: vars.string("API_HOST", default_host),
                port: vars.required_parsed("API_PORT")?,
            },
            database: DatabaseConfig {
                url: vars.required("DATABASE_URL")?,
                max_connections: vars.parsed_or("DATABASE_MAX_CONNECTIONS", default_max_connections)?,
                min_connections: vars.parsed_or("DATABASE_MIN_CONNECTIONS", default_min_connections)?,
            },
            redis: RedisConfig {
                url: vars.required("REDIS_URL")?,
                max_connections: vars
                    .parsed_or("REDIS_MAX_CONNECTIONS", default_redis_max_connections)?,
                wait_timeout_ms: vars
                    .parsed_or("REDIS_WAIT_TIMEOUT_MS", default_redis_wait_timeout_ms)?,
            },
            jwt: JwtConfig {
                secret: vars.required("JWT_SECRET")?,
                access_token_expiry: vars
                    .parsed_or("JWT_ACCESS_TOKEN_EXPIRY", default_access_token_expiry)?,
            },
            rate_limit: RateLimitConfig {
                requests_per_second: vars
                    .parsed_or("RATE_LIMIT_REQUESTS_PER_SECOND", default_requests_per_second)?,
                burst: vars.parsed_or("RATE_LIMIT_BURST", default_burst)?,
            },
            cors: CorsConfig {
                allowed_origins: vars
                    .get("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            blog: BlogConfig {
                website_url: vars
                    .string("BLOG_WEBSITE_URL", default_website_url)
                    .trim_end_matches('/')
                    .to_string(),
                admin_user_id: vars.parsed_or("BLOG_ADMIN_USER_ID", default_admin_user_id)?,
                config_cache_ttl: vars.parsed_or("BLOG_CONFIG_CACHE_TTL", default_config_cache_ttl)?,
            },
            notification: NotificationConfig {
                workers: vars.parsed_or("NOTIFY_WORKERS", default_notify_workers)?.max(1),
                queue_capacity: vars
                    .parsed_or("NOTIFY_QUEUE_CAPACITY", default_notify_queue_capacity)?
                    .max(1),
                exchange: vars.string("NOTIFY_EXCHANGE", default_notify_exchange),
                routing_key: vars.string("NOTIFY_ROUTING_KEY", default_notify_routing_key),
            },
            geo: GeoConfig {
                enabled: vars.parsed_or("GEO_LOOKUP_ENABLED", default_true)?,
                url: vars.string("GEO_LOOKUP_URL", default_geo_url),
                timeout_ms: vars.parsed_or("GEO_LOOKUP_TIMEOUT_MS", default_geo_timeout_ms)?,
            },
            content: ContentFilterConfig {
                sensitive_words_path: vars.get("SENSITIVE_WORDS_PATH").map(PathBuf::from),
            },
        })
    }
}

/// Typed access to a key lookup
struct Vars<'a, F>(&'a F);

impl<F> Vars<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, name: &str) -> Option<String> {
        (self.0)(name).filter(|v| !v.trim().is_empty())
    }

    fn string(&self, name: &str, default: fn() -> String) -> String {
        self.get(name).unwrap_or_else(default)
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.get(name).ok_or(ConfigError::MissingVar(name))
    }

    fn required_parsed<T: FromStr>(&self, name: &'static str) -> Result<T, ConfigError> {
        let raw = self.required(name)?;
        raw.trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name, raw))
    }

    fn parsed_or<T: FromStr>(
        &self,
        name: &'static str,
        default: impl FnOnce() -> T,
    ) -> Result<T, ConfigError> {
        match self.get(name) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(name, raw)),
            None => Ok(default()),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
