//! Repository traits (ports) - define the interface for relational data access
//!
//! The application layer only ever sees these traits; `blog-db` provides the
//! PostgreSQL implementations and the integration tests provide in-memory ones.

use async_trait::async_trait;

use crate::entities::{
    Article, Comment, GuestbookMessage, NewComment, NewGuestbookMessage, Talk, UserInfo,
    WebsiteConfig,
};
use crate::error::DomainError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Comment Repository
// ============================================================================

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Insert a comment and return its generated ID
    async fn insert(&self, comment: &NewComment) -> RepoResult<i64>;

    /// Find comment by ID
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Comment>>;

    /// Set the review flag on every listed comment, returning rows touched
    async fn update_review_status(&self, ids: &[i64], is_review: bool) -> RepoResult<u64>;

    /// Hard delete comments, returning rows removed
    async fn remove_by_ids(&self, ids: &[i64]) -> RepoResult<u64>;
}

// ============================================================================
// Guestbook Repository
// ============================================================================

#[async_trait]
pub trait GuestbookRepository: Send + Sync {
    async fn insert(&self, message: &NewGuestbookMessage) -> RepoResult<i64>;

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<GuestbookMessage>>;

    async fn update_review_status(&self, ids: &[i64], is_review: bool) -> RepoResult<u64>;

    async fn remove_by_ids(&self, ids: &[i64]) -> RepoResult<u64>;
}

// ============================================================================
// Read-only collaborators
// ============================================================================

#[async_trait]
pub trait ArticleRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Article>>;
}

#[async_trait]
pub trait TalkRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Talk>>;
}

#[async_trait]
pub trait UserInfoRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<UserInfo>>;
}

// ============================================================================
// Website Config Repository
// ============================================================================

#[async_trait]
pub trait WebsiteConfigRepository: Send + Sync {
    /// Load the stored configuration document, if any
    async fn find(&self) -> RepoResult<Option<WebsiteConfig>>;

    /// Replace the stored configuration document
    async fn save(&self, config: &WebsiteConfig) -> RepoResult<()>;
}
