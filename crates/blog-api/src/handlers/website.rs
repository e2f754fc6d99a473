//! Website configuration handler

use axum::{extract::State, Json};
use blog_core::WebsiteConfig;
use blog_service::{UpdateWebsiteConfigRequest, WebsiteService};

use crate::extractors::AuthUser;
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Current website configuration
///
/// GET /website/config
pub async fn get_website_config(State(state): State<AppState>) -> ApiResult<Json<WebsiteConfig>> {
    let config = WebsiteService::new(state.service_context())
        .get_config()
        .await?;
    Ok(Json(config))
}

/// Replace the website configuration
///
/// PUT /admin/website/config
pub async fn update_website_config(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Result<Json<UpdateWebsiteConfigRequest>, axum::extract::rejection::JsonRejection>,
) -> ApiResult<Json<WebsiteConfig>> {
    let Json(request) = body.map_err(|e| ApiError::invalid_body(e.body_text()))?;

    let service = WebsiteService::new(state.service_context());
    let config = service
        .update_config(Some(auth.user_id), request.config)
        .await?;
    Ok(Json(config))
}
