//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use blog_core::{CommentType, WebsiteConfig};
use serde::Deserialize;
use validator::{Validate, ValidationError};

/// Longest comment or guestbook message accepted, in characters
pub const MAX_CONTENT_CHARS: u64 = 1000;

/// Largest `limit` accepted by ranking endpoints
pub const MAX_RANK_LIMIT: usize = 50;

// ============================================================================
// Comment Requests
// ============================================================================

/// Submit comment request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_comment_topic"))]
pub struct CreateCommentRequest {
    /// User being replied to, `0`/absent for none
    pub reply_user_id: Option<i64>,

    /// Article or talk id; unused for friend-link comments
    pub topic_id: Option<i64>,

    /// Top-level comment this one belongs under
    pub parent_id: Option<i64>,

    /// 1 = article, 2 = link, 3 = talk
    #[serde(rename = "type")]
    #[validate(range(min = 1, max = 3, message = "Comment type must be 1, 2 or 3"))]
    pub comment_type: i32,

    #[serde(alias = "commentContent")]
    #[validate(length(min = 1, max = 1000, message = "Content must be 1-1000 characters"))]
    pub content: String,
}

impl CreateCommentRequest {
    /// Parsed comment type; only fails for requests that skipped validation
    pub fn kind(&self) -> Result<CommentType, blog_core::DomainError> {
        CommentType::try_from(self.comment_type)
    }
}

fn validate_comment_topic(request: &CreateCommentRequest) -> Result<(), ValidationError> {
    let Ok(kind) = request.kind() else {
        // Reported by the field level range check
        return Ok(());
    };

    if kind.requires_topic() && request.topic_id.is_none() {
        let mut err = ValidationError::new("topic_required");
        err.message = Some(format!("{kind} comments require a topicId").into());
        return Err(err);
    }
    Ok(())
}

// ============================================================================
// Guestbook Requests
// ============================================================================

/// Leave a guestbook message request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageRequest {
    #[validate(length(min = 1, max = 50, message = "Nickname must be 1-50 characters"))]
    pub nickname: String,

    #[validate(length(max = 255, message = "Avatar URL must be at most 255 characters"))]
    pub avatar: Option<String>,

    #[serde(alias = "messageContent")]
    #[validate(length(min = 1, max = 1000, message = "Content must be 1-1000 characters"))]
    pub content: String,

    /// Scroll time in seconds on the danmaku wall
    #[validate(range(min = 1, max = 60, message = "Speed must be 1-60"))]
    pub speed: Option<i32>,
}

// ============================================================================
// Admin Requests
// ============================================================================

/// Approve or hide a batch of comments or messages
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    #[validate(length(min = 1, message = "ids must not be empty"))]
    pub ids: Vec<i64>,

    pub is_review: bool,
}

/// Delete a batch of comments or messages
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DeleteRequest {
    #[validate(length(min = 1, message = "ids must not be empty"))]
    pub ids: Vec<i64>,
}

/// Replace the website configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct UpdateWebsiteConfigRequest {
    pub config: WebsiteConfig,
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Ranking query (`?limit=`)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RankQuery {
    #[validate(range(min = 1, max = 50, message = "limit must be 1-50"))]
    pub limit: Option<usize>,
}

impl RankQuery {
    pub const DEFAULT_LIMIT: usize = 5;

    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT).min(MAX_RANK_LIMIT)
    }
}
