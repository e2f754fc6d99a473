//! Guestbook message service
//!
//! Anonymous visitors leave messages on the guestbook wall. Content goes
//! through the same sanitiser and moderation gate as comments.

use blog_core::{ContentKind, GuestbookMessage, NewGuestbookMessage, VisitorInfo};
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use crate::dto::CreateMessageRequest;

use super::comment::normalize_ids;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::filter::is_web_url;
use super::moderation::initial_review_state;

/// Scroll time used when the client does not pick one
pub const DEFAULT_MESSAGE_SPEED: i32 = 9;

/// Guestbook message service
pub struct MessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Sanitise, moderate and store a guestbook message
    #[instrument(skip(self, visitor, request), fields(ip = %visitor.ip_address))]
    pub async fn submit_message(
        &self,
        visitor: &VisitorInfo,
        request: CreateMessageRequest,
    ) -> ServiceResult<GuestbookMessage> {
        request.validate()?;

        let config = self.ctx.config_provider().get_config().await?;

        let filter = self.ctx.content_filter();
        let content = filter.filter(&request.content)?;
        let nickname = filter.sanitize(&request.nickname);
        if nickname.is_empty() {
            return Err(ServiceError::validation("nickname is empty after filtering"));
        }

        let ip_source = match self.ctx.geo_locator().locate(&visitor.ip_address).await {
            Ok(region) => region.unwrap_or_default(),
            Err(e) => {
                debug!(error = %e, "Geo lookup failed");
                String::new()
            }
        };

        // Anything but an http(s) image falls back to the site's visitor avatar
        let avatar = match request.avatar {
            Some(avatar) if is_web_url(&avatar) => avatar.trim().to_string(),
            Some(avatar) if !avatar.trim().is_empty() => {
                warn!(avatar = %avatar, "Rejected guestbook avatar URL");
                config.tourist_avatar.clone().unwrap_or_default()
            }
            _ => config.tourist_avatar.clone().unwrap_or_default(),
        };

        let is_review = initial_review_state(&config, ContentKind::Message);

        let new_message = NewGuestbookMessage {
            nickname,
            avatar,
            content,
            ip_address: visitor.ip_address.clone(),
            ip_source,
            speed: request.speed.unwrap_or(DEFAULT_MESSAGE_SPEED),
            is_review,
        };

        let message_id = self.ctx.guestbook_repo().insert(&new_message).await?;

        let saved = self
            .ctx
            .guestbook_repo()
            .find_by_id(message_id)
            .await?
            .ok_or_else(|| {
                ServiceError::internal(format!("message {message_id} missing after insert"))
            })?;

        info!(message_id, is_review, "Guestbook message saved");
        Ok(saved)
    }

    /// Publish or hide guestbook messages (admin only)
    #[instrument(skip(self))]
    pub async fn review_messages(
        &self,
        actor: Option<i64>,
        ids: &[i64],
        is_review: bool,
    ) -> ServiceResult<u64> {
        self.ctx.require_admin(actor, "review messages")?;
        let ids = normalize_ids(ids)?;

        let affected = self
            .ctx
            .guestbook_repo()
            .update_review_status(&ids, is_review)
            .await?;

        info!(requested = ids.len(), affected, is_review, "Messages reviewed");
        Ok(affected)
    }

    /// Hard delete guestbook messages (admin only)
    #[instrument(skip(self))]
    pub async fn remove_messages(&self, actor: Option<i64>, ids: &[i64]) -> ServiceResult<u64> {
        self.ctx.require_admin(actor, "delete messages")?;
        let ids = normalize_ids(ids)?;

        let affected = self.ctx.guestbook_repo().remove_by_ids(&ids).await?;

        info!(requested = ids.len(), affected, "Messages deleted");
        Ok(affected)
    }
}
