//! Like handlers
//!
//! Toggle endpoints for articles, comments and talks.

use axum::{extract::State, Json};
use blog_core::EntityKind;
use blog_service::{EngagementService, LikeResponse};

use crate::extractors::{IdPath, OptionalAuthUser};
use crate::response::ApiResult;
use crate::state::AppState;

async fn toggle(
    state: &AppState,
    auth: OptionalAuthUser,
    kind: EntityKind,
    entity_id: i64,
) -> ApiResult<Json<LikeResponse>> {
    let service = EngagementService::new(state.service_context());
    let like_count = service.toggle_like(auth.user_id(), kind, entity_id).await?;
    Ok(Json(LikeResponse { like_count }))
}

/// Like or unlike an article
///
/// POST /articles/{id}/like
pub async fn like_article(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    IdPath(article_id): IdPath,
) -> ApiResult<Json<LikeResponse>> {
    toggle(&state, auth, EntityKind::Article, article_id).await
}

/// Like or unlike a comment
///
/// POST /comments/{id}/like
pub async fn like_comment(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    IdPath(comment_id): IdPath,
) -> ApiResult<Json<LikeResponse>> {
    toggle(&state, auth, EntityKind::Comment, comment_id).await
}

/// Like or unlike a talk
///
/// POST /talks/{id}/like
pub async fn like_talk(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    IdPath(talk_id): IdPath,
) -> ApiResult<Json<LikeResponse>> {
    toggle(&state, auth, EntityKind::Talk, talk_id).await
}
