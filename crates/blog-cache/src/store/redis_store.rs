//! [`KeyValueStore`] over a Redis pool.
//!
//! Each method is one Redis command on a pooled connection.

use async_trait::async_trait;
use blog_core::{KeyValueStore, RepoResult};
use redis::AsyncCommands;
use std::collections::HashMap;
use std::time::Duration;

use crate::pool::RedisPool;

#[derive(Debug, Clone)]
pub struct RedisKeyValueStore {
    pool: RedisPool,
}

impl RedisKeyValueStore {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    async fn conn(&self) -> RepoResult<deadpool_redis::Connection> {
        Ok(self.pool.get().await?)
    }
}

fn cache_err(err: redis::RedisError) -> blog_core::DomainError {
    blog_core::DomainError::CacheError(err.to_string())
}

#[async_trait]
impl KeyValueStore for RedisKeyValueStore {
    async fn get(&self, key: &str) -> RepoResult<Option<String>> {
        let mut conn = self.conn().await?;
        conn.get(key).await.map_err(cache_err)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> RepoResult<()> {
        let mut conn = self.conn().await?;
        match ttl {
            // SETEX rejects 0
            Some(ttl) => conn
                .set_ex::<_, _, ()>(key, value, ttl.as_secs().max(1))
                .await
                .map_err(cache_err),
            None => conn.set::<_, _, ()>(key, value).await.map_err(cache_err),
        }
    }

    async fn delete(&self, key: &str) -> RepoResult<bool> {
        let mut conn = self.conn().await?;
        let deleted: i64 = conn.del(key).await.map_err(cache_err)?;
        Ok(deleted > 0)
    }

    async fn incr_by(&self, key: &str, delta: i64) -> RepoResult<i64> {
        let mut conn = self.conn().await?;
        conn.incr(key, delta).await.map_err(cache_err)
    }

    async fn decr_by(&self, key: &str, delta: i64) -> RepoResult<i64> {
        let mut conn = self.conn().await?;
        conn.decr(key, delta).await.map_err(cache_err)
    }

    async fn hget(&self, key: &str, field: &str) -> RepoResult<Option<String>> {
        let mut conn = self.conn().await?;
        conn.hget(key, field).await.map_err(cache_err)
    }

    async fn hset(&self, key: &str, field: &str, value: &str) -> RepoResult<()> {
        let mut conn = self.conn().await?;
        conn.hset::<_, _, _, ()>(key, field, value)
            .await
            .map_err(cache_err)
    }

    async fn hincr_by(&self, key: &str, field: &str, delta: i64) -> RepoResult<i64> {
        let mut conn = self.conn().await?;
        conn.hincr(key, field, delta).await.map_err(cache_err)
    }

    async fn hget_all(&self, key: &str) -> RepoResult<HashMap<String, String>> {
        let mut conn = self.conn().await?;
        conn.hgetall(key).await.map_err(cache_err)
    }

    async fn sadd(&self, key: &str, member: &str) -> RepoResult<u64> {
        let mut conn = self.conn().await?;
        conn.sadd(key, member).await.map_err(cache_err)
    }

    async fn srem(&self, key: &str, member: &str) -> RepoResult<u64> {
        let mut conn = self.conn().await?;
        conn.srem(key, member).await.map_err(cache_err)
    }

    async fn sismember(&self, key: &str, member: &str) -> RepoResult<bool> {
        let mut conn = self.conn().await?;
        conn.sismember(key, member).await.map_err(cache_err)
    }

    async fn smembers(&self, key: &str) -> RepoResult<Vec<String>> {
        let mut conn = self.conn().await?;
        conn.smembers(key).await.map_err(cache_err)
    }

    async fn zincr_by(&self, key: &str, member: &str, delta: f64) -> RepoResult<f64> {
        let mut conn = self.conn().await?;
        conn.zincr(key, member, delta).await.map_err(cache_err)
    }

    async fn zscore(&self, key: &str, member: &str) -> RepoResult<Option<f64>> {
        let mut conn = self.conn().await?;
        conn.zscore(key, member).await.map_err(cache_err)
    }

    async fn zrevrange_with_scores(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> RepoResult<Vec<(String, f64)>> {
        let mut conn = self.conn().await?;
        conn.zrevrange_withscores(key, start, stop)
            .await
            .map_err(cache_err)
    }
}
