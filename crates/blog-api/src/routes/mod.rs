//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::{comments, health, likes, messages, stats, website};
use crate::state::AppState;

/// Create the main API router (health routes are mounted separately, outside the rate limiter)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(engagement_routes())
        .merge(content_routes())
        .merge(admin_routes())
}

/// Likes, views and visits
fn engagement_routes() -> Router<AppState> {
    Router::new()
        .route("/articles/:id/like", post(likes::like_article))
        .route("/comments/:id/like", post(likes::like_comment))
        .route("/talks/:id/like", post(likes::like_talk))
        .route("/articles/:id/stats", get(stats::article_stats))
        .route("/articles/rank", get(stats::article_rank))
        .route("/report", post(stats::report_visit))
        .route("/blog/stats", get(stats::blog_stats))
}

/// Comment and guestbook submission, public site settings
fn content_routes() -> Router<AppState> {
    Router::new()
        .route("/comments", post(comments::create_comment))
        .route("/messages", post(messages::create_message))
        .route("/website/config", get(website::get_website_config))
}

/// Moderation and configuration (admin only)
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/comments/review", put(comments::review_comments))
        .route("/admin/comments", delete(comments::delete_comments))
        .route("/admin/messages/review", put(messages::review_messages))
        .route("/admin/messages", delete(messages::delete_messages))
        .route("/admin/website/config", put(website::update_website_config))
}
