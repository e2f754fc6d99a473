//! Comment database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for comments table
#[derive(Debug, Clone, FromRow)]
pub struct CommentModel {
    pub id: i64,
    pub user_id: i64,
    pub reply_user_id: Option<i64>,
    pub topic_id: Option<i64>,
    pub parent_id: Option<i64>,
    pub comment_type: i32,
    pub comment_content: String,
    pub is_review: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}
