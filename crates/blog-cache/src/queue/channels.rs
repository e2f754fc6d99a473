//! Queue naming.
//!
//! A queue is addressed the way an AMQP producer would address it: an
//! exchange plus a routing key. On Redis each pair is one list.

/// Prefix shared by every queue list
pub const QUEUE_PREFIX: &str = "queue:";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueueChannel {
    pub exchange: String,
    pub routing_key: String,
}

impl QueueChannel {
    #[must_use]
    pub fn new(exchange: impl Into<String>, routing_key: impl Into<String>) -> Self {
        Self {
            exchange: exchange.into(),
            routing_key: routing_key.into(),
        }
    }

    /// Get the Redis list name
    #[must_use]
    pub fn name(&self) -> String {
        format!("{QUEUE_PREFIX}{}:{}", self.exchange, self.routing_key)
    }

    /// Parse a list name back to a `QueueChannel`
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let rest = name.strip_prefix(QUEUE_PREFIX)?;
        let (exchange, routing_key) = rest.split_once(':')?;
        if exchange.is_empty() || routing_key.is_empty() {
            return None;
        }
        Some(Self::new(exchange, routing_key))
    }
}

impl std::fmt::Display for QueueChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
