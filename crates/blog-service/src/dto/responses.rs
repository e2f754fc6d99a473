//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.

use chrono::{DateTime, Utc};
use serde::Serialize;

// ============================================================================
// Engagement Responses
// ============================================================================

/// Counter after a like toggle
#[derive(Debug, Clone, Serialize)]
pub struct LikeResponse {
    pub like_count: i64,
}

/// Views and likes of one article
#[derive(Debug, Clone, Serialize)]
pub struct ArticleStatsResponse {
    pub article_id: i64,
    pub views_count: i64,
    pub like_count: i64,
}

/// One row of the most viewed articles
#[derive(Debug, Clone, Serialize)]
pub struct RankedArticleResponse {
    pub article_id: i64,
    pub views_count: i64,
}

/// Site-wide visit statistics
#[derive(Debug, Clone, Serialize)]
pub struct BlogStatsResponse {
    pub views_count: i64,
    pub areas: Vec<AreaCount>,
}

/// Visitors from one region
#[derive(Debug, Clone, Serialize)]
pub struct AreaCount {
    pub name: String,
    pub value: i64,
}

// ============================================================================
// Content Responses
// ============================================================================

/// Saved comment
#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub id: i64,
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    #[serde(rename = "type")]
    pub comment_type: i32,
    pub content: String,
    pub is_review: bool,
    pub created_at: DateTime<Utc>,
}

/// Saved guestbook message
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub id: i64,
    pub nickname: String,
    pub avatar: String,
    pub content: String,
    pub ip_source: String,
    pub speed: i32,
    pub is_review: bool,
    pub created_at: DateTime<Utc>,
}

/// Rows touched by an admin batch operation
#[derive(Debug, Clone, Serialize)]
pub struct BatchResponse {
    pub affected: u64,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each backing service
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub database: String,
    pub redis: String,
    pub notifications: String,
}

fn health_label(healthy: bool) -> String {
    if healthy { "healthy" } else { "unhealthy" }.to_string()
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool, redis_healthy: bool, notifications_running: bool) -> Self {
        let all_healthy = database_healthy && redis_healthy && notifications_running;
        Self {
            status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: health_label(database_healthy),
                redis: health_label(redis_healthy),
                notifications: health_label(notifications_running),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
