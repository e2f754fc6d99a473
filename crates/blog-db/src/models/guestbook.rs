//! Guestbook message database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct GuestbookMessageModel {
    pub id: i64,
    pub nickname: String,
    pub avatar: String,
    pub message_content: String,
    pub ip_address: String,
    pub ip_source: String,
    pub speed: i32,
    pub is_review: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}
