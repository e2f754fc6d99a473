//! Redis list publisher.
//!
//! `RPUSH` returns only after Redis has appended the payload, which is the
//! acknowledgment the mail worker's `BLPOP` side relies on.

use async_trait::async_trait;
use blog_core::{DomainError, MessageQueuePublisher, RepoResult};
use redis::AsyncCommands;

use crate::pool::RedisPool;
use crate::queue::QueueChannel;

#[derive(Debug, Clone)]
pub struct RedisQueuePublisher {
    pool: RedisPool,
}

impl RedisQueuePublisher {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Push a payload, returning the queue length afterwards
    pub async fn push(&self, channel: &QueueChannel, payload: &[u8]) -> RepoResult<u64> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| DomainError::QueueError(e.to_string()))?;
        let list = channel.name();

        let depth: u64 = conn
            .rpush(&list, payload)
            .await
            .map_err(|e| DomainError::QueueError(e.to_string()))?;

        tracing::debug!(
            queue = %list,
            bytes = payload.len(),
            depth = depth,
            "Published job"
        );

        Ok(depth)
    }
}

#[async_trait]
impl MessageQueuePublisher for RedisQueuePublisher {
    async fn publish(&self, exchange: &str, routing_key: &str, payload: &[u8]) -> RepoResult<()> {
        self.push(&QueueChannel::new(exchange, routing_key), payload)
            .await
            .map(|_| ())
    }
}
