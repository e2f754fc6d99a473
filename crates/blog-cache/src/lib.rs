//! # blog-cache
//!
//! Redis adapters for the engagement counters, visitor tracking, the cached
//! website configuration, and the email job queue.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Key Namespaces**: Every Redis key the backend touches, in one place
//! - **Key/Value Store**: [`KeyValueStore`](blog_core::KeyValueStore) over Redis strings, hashes and sets
//! - **Queue**: Email jobs pushed onto Redis lists for the mail worker
//!
//! ## Example
//!
//! ```ignore
//! use blog_cache::{RedisKeyValueStore, RedisPool, RedisPoolConfig, RedisQueuePublisher};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let store = RedisKeyValueStore::new(pool.clone());
//! let publisher = RedisQueuePublisher::new(pool);
//!
//! store.hincr_by(keys::ARTICLE_LIKE_COUNT, "7", 1).await?;
//! publisher.publish("email_exchange", "email", payload).await?;
//! ```

pub mod keys;
pub mod pool;
pub mod queue;
pub mod store;

// Re-export pool types
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult, SharedRedisPool};

// Re-export adapters
pub use queue::{QueueChannel, RedisQueuePublisher, QUEUE_PREFIX};
pub use store::RedisKeyValueStore;
