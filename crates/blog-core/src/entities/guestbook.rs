//! Guestbook message entity (the "leave a message" wall)

use chrono::{DateTime, Utc};

/// Guestbook message, as persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestbookMessage {
    pub id: i64,
    pub nickname: String,
    pub avatar: String,
    pub content: String,
    pub ip_address: String,
    /// Region resolved from the IP address, `""` when unknown
    pub ip_source: String,
    /// Danmaku scroll time in seconds
    pub speed: i32,
    pub is_review: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Guestbook message ready to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGuestbookMessage {
    pub nickname: String,
    pub avatar: String,
    pub content: String,
    pub ip_address: String,
    pub ip_source: String,
    pub speed: i32,
    pub is_review: bool,
}

impl NewGuestbookMessage {
    pub fn into_message(self, id: i64, created_at: DateTime<Utc>) -> GuestbookMessage {
        GuestbookMessage {
            id,
            nickname: self.nickname,
            avatar: self.avatar,
            content: self.content,
            ip_address: self.ip_address,
            ip_source: self.ip_source,
            speed: self.speed,
            is_review: self.is_review,
            created_at,
            updated_at: None,
        }
    }
}
