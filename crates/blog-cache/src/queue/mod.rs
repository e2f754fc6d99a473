//! Email job queue on Redis lists.

mod channels;
mod publisher;

pub use channels::{QueueChannel, QUEUE_PREFIX};
pub use publisher::RedisQueuePublisher;
