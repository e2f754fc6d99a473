//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Comment not found: {0}")]
    CommentNotFound(i64),

    #[error("Guestbook message not found: {0}")]
    MessageNotFound(i64),

    #[error("Article not found: {0}")]
    ArticleNotFound(i64),

    #[error("Talk not found: {0}")]
    TalkNotFound(i64),

    #[error("User not found: {0}")]
    UserNotFound(i64),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Content is empty after filtering")]
    EmptyContent,

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    #[error("Unknown comment type: {0}")]
    UnknownCommentType(i32),

    #[error("Unknown entity kind: {0}")]
    UnknownEntityKind(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Queue error: {0}")]
    QueueError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::CommentNotFound(_) => "UNKNOWN_COMMENT",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",
            Self::ArticleNotFound(_) => "UNKNOWN_ARTICLE",
            Self::TalkNotFound(_) => "UNKNOWN_TALK",
            Self::UserNotFound(_) => "UNKNOWN_USER",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::EmptyContent => "EMPTY_CONTENT",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::UnknownCommentType(_) => "UNKNOWN_COMMENT_TYPE",
            Self::UnknownEntityKind(_) => "UNKNOWN_ENTITY_KIND",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::QueueError(_) => "QUEUE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::CommentNotFound(_)
                | Self::MessageNotFound(_)
                | Self::ArticleNotFound(_)
                | Self::TalkNotFound(_)
                | Self::UserNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::EmptyContent
                | Self::ContentTooLong { .. }
                | Self::UnknownCommentType(_)
                | Self::UnknownEntityKind(_)
        )
    }

    /// Check if a backing store (database, cache, queue) failed
    pub fn is_store_unavailable(&self) -> bool {
        matches!(
            self,
            Self::DatabaseError(_) | Self::CacheError(_) | Self::QueueError(_)
        )
    }
}
