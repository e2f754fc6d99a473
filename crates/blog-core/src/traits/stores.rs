//! Cache, queue and lookup ports
//!
//! `KeyValueStore` mirrors the handful of Redis primitives the engagement
//! counters are built from. Every method is a single-key atomic operation;
//! callers compose them without any surrounding lock.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

use crate::entities::WebsiteConfig;
use crate::traits::RepoResult;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    // === Strings ===

    async fn get(&self, key: &str) -> RepoResult<Option<String>>;

    /// Set a string value, expiring after `ttl` when given
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> RepoResult<()>;

    /// Delete a key, returning whether it existed
    async fn delete(&self, key: &str) -> RepoResult<bool>;

    async fn incr_by(&self, key: &str, delta: i64) -> RepoResult<i64>;

    /// Atomic decrement of a string counter; hash counters use `hincr_by`
    async fn decr_by(&self, key: &str, delta: i64) -> RepoResult<i64>;

    // === Hashes ===

    async fn hget(&self, key: &str, field: &str) -> RepoResult<Option<String>>;

    async fn hset(&self, key: &str, field: &str, value: &str) -> RepoResult<()>;

    /// Increment a hash field, returning the new value
    async fn hincr_by(&self, key: &str, field: &str, delta: i64) -> RepoResult<i64>;

    async fn hget_all(&self, key: &str) -> RepoResult<HashMap<String, String>>;

    // === Sets ===

    /// Add a member, returning how many were newly added (0 or 1)
    async fn sadd(&self, key: &str, member: &str) -> RepoResult<u64>;

    /// Remove a member, returning how many were actually removed (0 or 1)
    async fn srem(&self, key: &str, member: &str) -> RepoResult<u64>;

    async fn sismember(&self, key: &str, member: &str) -> RepoResult<bool>;

    async fn smembers(&self, key: &str) -> RepoResult<Vec<String>>;

    // === Sorted sets ===

    /// Increment a member's score, returning the new score
    async fn zincr_by(&self, key: &str, member: &str, delta: f64) -> RepoResult<f64>;

    async fn zscore(&self, key: &str, member: &str) -> RepoResult<Option<f64>>;

    /// Members ordered by descending score, inclusive rank range
    async fn zrevrange_with_scores(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> RepoResult<Vec<(String, f64)>>;
}

/// Publishes serialized jobs to a message queue.
///
/// Returns once the broker has acknowledged the payload.
#[async_trait]
pub trait MessageQueuePublisher: Send + Sync {
    async fn publish(&self, exchange: &str, routing_key: &str, payload: &[u8]) -> RepoResult<()>;
}

/// Current website configuration, however it is stored or cached
#[async_trait]
pub trait WebsiteConfigProvider: Send + Sync {
    async fn get_config(&self) -> RepoResult<WebsiteConfig>;

    /// Drop any cached copy so the next read sees the stored document
    async fn invalidate(&self) -> RepoResult<()> {
        Ok(())
    }
}

/// Resolves an IP address to a human readable region
#[async_trait]
pub trait GeoLocator: Send + Sync {
    /// `Ok(None)` when the address could not be placed
    async fn locate(&self, ip_address: &str) -> RepoResult<Option<String>>;
}
