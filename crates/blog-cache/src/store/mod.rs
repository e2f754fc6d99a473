//! Redis-backed key/value store.

mod redis_store;

pub use redis_store::RedisKeyValueStore;
