//! Entity to DTO mappers

use blog_core::{Comment, GuestbookMessage};

use super::responses::{AreaCount, CommentResponse, MessageResponse, RankedArticleResponse};

impl From<&Comment> for CommentResponse {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id,
            user_id: comment.user_id,
            reply_user_id: comment.reply_target(),
            topic_id: comment.topic_id,
            parent_id: comment.parent_id,
            comment_type: comment.comment_type.as_i32(),
            content: comment.content.clone(),
            is_review: comment.is_review,
            created_at: comment.created_at,
        }
    }
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self::from(&comment)
    }
}

// The client IP stays server side
impl From<GuestbookMessage> for MessageResponse {
    fn from(message: GuestbookMessage) -> Self {
        Self {
            id: message.id,
            nickname: message.nickname,
            avatar: message.avatar,
            content: message.content,
            ip_source: message.ip_source,
            speed: message.speed,
            is_review: message.is_review,
            created_at: message.created_at,
        }
    }
}

impl From<(i64, i64)> for RankedArticleResponse {
    fn from((article_id, views_count): (i64, i64)) -> Self {
        Self {
            article_id,
            views_count,
        }
    }
}

impl From<(String, i64)> for AreaCount {
    fn from((name, value): (String, i64)) -> Self {
        Self { name, value }
    }
}
