//! Guestbook handlers

use axum::{extract::State, Json};
use blog_service::{
    BatchResponse, CreateMessageRequest, DeleteRequest, MessageResponse, MessageService,
    ReviewRequest,
};

use crate::extractors::{ClientInfo, OptionalAuthUser, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Leave a guestbook message
///
/// POST /messages
pub async fn create_message(
    State(state): State<AppState>,
    client: ClientInfo,
    ValidatedJson(request): ValidatedJson<CreateMessageRequest>,
) -> ApiResult<Created<Json<MessageResponse>>> {
    let service = MessageService::new(state.service_context());
    let message = service.submit_message(&client.visitor(), request).await?;
    Ok(Created(Json(message.into())))
}

/// Publish or hide guestbook messages
///
/// PUT /admin/messages/review
pub async fn review_messages(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    ValidatedJson(request): ValidatedJson<ReviewRequest>,
) -> ApiResult<Json<BatchResponse>> {
    let service = MessageService::new(state.service_context());
    let affected = service
        .review_messages(auth.user_id(), &request.ids, request.is_review)
        .await?;
    Ok(Json(BatchResponse { affected }))
}

/// Delete guestbook messages
///
/// DELETE /admin/messages
pub async fn delete_messages(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    ValidatedJson(request): ValidatedJson<DeleteRequest>,
) -> ApiResult<Json<BatchResponse>> {
    let service = MessageService::new(state.service_context());
    let affected = service.remove_messages(auth.user_id(), &request.ids).await?;
    Ok(Json(BatchResponse { affected }))
}
