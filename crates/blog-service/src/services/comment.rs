//! Comment service
//!
//! The comment submission pipeline plus the admin batch operations on comments.

use blog_core::{Comment, ContentKind, NewComment};
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use crate::dto::CreateCommentRequest;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::moderation::initial_review_state;

/// Comment service
pub struct CommentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CommentService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Sanitise, moderate and store a comment, then queue its notification.
    ///
    /// Returns the row as stored. Notification problems are never reported here.
    #[instrument(skip(self, request), fields(comment_type = request.comment_type))]
    pub async fn submit_comment(
        &self,
        actor: Option<i64>,
        request: CreateCommentRequest,
    ) -> ServiceResult<Comment> {
        let user_id = actor.ok_or(ServiceError::Unauthenticated)?;
        request.validate()?;
        let comment_type = request.kind()?;

        let content = self.ctx.content_filter().filter(&request.content)?;
        let config = self.ctx.config_provider().get_config().await?;
        let is_review = initial_review_state(&config, ContentKind::Comment);

        let new_comment = NewComment {
            user_id,
            reply_user_id: request.reply_user_id.filter(|id| *id != 0),
            topic_id: request.topic_id,
            parent_id: request.parent_id,
            comment_type,
            content,
            is_review,
        };

        let comment_id = self.ctx.comment_repo().insert(&new_comment).await?;

        let saved = self
            .ctx
            .comment_repo()
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| {
                ServiceError::internal(format!("comment {comment_id} missing after insert"))
            })?;

        info!(comment_id, user_id, is_review, "Comment saved");

        if config.is_email_notice {
            if !self.ctx.notifications().submit(saved.clone()) {
                warn!(comment_id, "Comment notification not queued");
            }
        } else {
            debug!(comment_id, "Email notices disabled");
        }

        Ok(saved)
    }

    /// Publish or hide comments (admin only)
    #[instrument(skip(self))]
    pub async fn review_comments(
        &self,
        actor: Option<i64>,
        ids: &[i64],
        is_review: bool,
    ) -> ServiceResult<u64> {
        self.ctx.require_admin(actor, "review comments")?;
        let ids = normalize_ids(ids)?;

        let affected = self
            .ctx
            .comment_repo()
            .update_review_status(&ids, is_review)
            .await?;

        info!(requested = ids.len(), affected, is_review, "Comments reviewed");
        Ok(affected)
    }

    /// Hard delete comments (admin only)
    #[instrument(skip(self))]
    pub async fn remove_comments(&self, actor: Option<i64>, ids: &[i64]) -> ServiceResult<u64> {
        self.ctx.require_admin(actor, "delete comments")?;
        let ids = normalize_ids(ids)?;

        let affected = self.ctx.comment_repo().remove_by_ids(&ids).await?;

        info!(requested = ids.len(), affected, "Comments deleted");
        Ok(affected)
    }
}

/// Sorted, de-duplicated ids; an empty batch is rejected
pub(crate) fn normalize_ids(ids: &[i64]) -> ServiceResult<Vec<i64>> {
    if ids.is_empty() {
        return Err(ServiceError::validation("ids must not be empty"));
    }

    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    Ok(ids)
}
