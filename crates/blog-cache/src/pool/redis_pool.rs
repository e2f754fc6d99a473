//! Pooled Redis connections shared by the counter store and the job queue.

use std::sync::Arc;
use std::time::{Duration, Instant};

use blog_core::DomainError;
use deadpool_redis::{Config, Connection, Pool, PoolError, Runtime, Timeouts};

/// Pool sizing and checkout limits
#[derive(Debug, Clone)]
pub struct RedisPoolConfig {
    pub url: String,
    pub max_connections: usize,
    /// Longest a caller waits for a free connection
    pub wait_timeout: Duration,
}

impl Default for RedisPoolConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            max_connections: 10,
            wait_timeout: Duration::from_millis(500),
        }
    }
}

impl From<&blog_common::RedisConfig> for RedisPoolConfig {
    fn from(config: &blog_common::RedisConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections as usize,
            wait_timeout: Duration::from_millis(config.wait_timeout_ms),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RedisPoolError {
    #[error("Invalid Redis pool settings: {0}")]
    Build(String),

    #[error("No Redis connection within {0:?}")]
    Exhausted(Duration),

    #[error("Redis connection failed: {0}")]
    Checkout(String),

    #[error("Redis command failed: {0}")]
    Redis(#[from] redis::RedisError),
}

pub type RedisResult<T> = Result<T, RedisPoolError>;

// Every pool failure means the counters are unreachable
impl From<RedisPoolError> for DomainError {
    fn from(err: RedisPoolError) -> Self {
        DomainError::CacheError(err.to_string())
    }
}

#[derive(Clone)]
pub struct RedisPool {
    pool: Pool,
    wait_timeout: Duration,
}

impl std::fmt::Debug for RedisPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = self.pool.status();
        f.debug_struct("RedisPool")
            .field("size", &status.size)
            .field("available", &status.available)
            .field("wait_timeout", &self.wait_timeout)
            .finish()
    }
}

impl RedisPool {
    /// Build the pool. Connections open lazily on first checkout.
    pub fn new(config: RedisPoolConfig) -> RedisResult<Self> {
        let pool = Config::from_url(&config.url)
            .builder()
            .map_err(|e| RedisPoolError::Build(e.to_string()))?
            .max_size(config.max_connections)
            .timeouts(Timeouts {
                wait: Some(config.wait_timeout),
                create: Some(config.wait_timeout),
                recycle: Some(config.wait_timeout),
            })
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| RedisPoolError::Build(e.to_string()))?;

        tracing::info!(
            host = %redact(&config.url),
            max_connections = config.max_connections,
            wait_timeout_ms = config.wait_timeout.as_millis() as u64,
            "Redis pool ready"
        );

        Ok(Self {
            pool,
            wait_timeout: config.wait_timeout,
        })
    }

    pub async fn get(&self) -> RedisResult<Connection> {
        self.pool.get().await.map_err(|err| match err {
            PoolError::Timeout(_) => RedisPoolError::Exhausted(self.wait_timeout),
            other => RedisPoolError::Checkout(other.to_string()),
        })
    }

    /// Round trip a PING, returning its latency
    pub async fn health_check(&self) -> RedisResult<Duration> {
        let started = Instant::now();
        let mut conn = self.get().await?;
        redis::cmd("PING").query_async::<String>(&mut conn).await?;
        Ok(started.elapsed())
    }
}

pub type SharedRedisPool = Arc<RedisPool>;

/// Host part of a connection URL, without credentials
fn redact(url: &str) -> &str {
    url.rsplit('@').next().unwrap_or(url)
}
