//! Comment handlers

use axum::{extract::State, Json};
use blog_service::{
    BatchResponse, CommentResponse, CommentService, CreateCommentRequest, DeleteRequest,
    ReviewRequest,
};

use crate::extractors::{OptionalAuthUser, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Submit a comment
///
/// POST /comments
pub async fn create_comment(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    ValidatedJson(request): ValidatedJson<CreateCommentRequest>,
) -> ApiResult<Created<Json<CommentResponse>>> {
    let service = CommentService::new(state.service_context());
    let comment = service.submit_comment(auth.user_id(), request).await?;
    Ok(Created(Json(comment.into())))
}

/// Publish or hide comments
///
/// PUT /admin/comments/review
pub async fn review_comments(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    ValidatedJson(request): ValidatedJson<ReviewRequest>,
) -> ApiResult<Json<BatchResponse>> {
    let service = CommentService::new(state.service_context());
    let affected = service
        .review_comments(auth.user_id(), &request.ids, request.is_review)
        .await?;
    Ok(Json(BatchResponse { affected }))
}

/// Delete comments
///
/// DELETE /admin/comments
pub async fn delete_comments(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    ValidatedJson(request): ValidatedJson<DeleteRequest>,
) -> ApiResult<Json<BatchResponse>> {
    let service = CommentService::new(state.service_context());
    let affected = service.remove_comments(auth.user_id(), &request.ids).await?;
    Ok(Json(BatchResponse { affected }))
}
