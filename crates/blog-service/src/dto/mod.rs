//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    CreateCommentRequest, CreateMessageRequest, DeleteRequest, RankQuery, ReviewRequest,
    UpdateWebsiteConfigRequest, MAX_CONTENT_CHARS, MAX_RANK_LIMIT,
};

pub use responses::{
    AreaCount, ArticleStatsResponse, BatchResponse, BlogStatsResponse, CommentResponse,
    HealthChecks, HealthResponse, LikeResponse, MessageResponse, RankedArticleResponse,
    ReadinessResponse,
};
