//! Comment notification dispatcher
//!
//! Turns a saved comment into an [`EmailJob`] and publishes it to the mail
//! queue. Published comments notify the reply target or the author of the
//! commented article/talk; comments held for review notify the administrator.

use std::sync::Arc;

use blog_core::traits::{
    ArticleRepository, MessageQueuePublisher, TalkRepository, UserInfoRepository,
};
use blog_core::{Comment, CommentType, EmailJob};
use tracing::{debug, info, instrument};

use super::context::BlogSettings;
use super::error::{ServiceError, ServiceResult};

pub const COMMENT_REMINDER_SUBJECT: &str = "comment reminder";
pub const MODERATION_REMINDER_SUBJECT: &str = "moderation reminder";
const MODERATION_REMINDER_BODY: &str =
    "You have received a new comment, please go to the admin console to review it";

/// Where notifications link to and where they are published
#[derive(Debug, Clone)]
pub struct NotificationSettings {
    pub website_url: String,
    pub admin_user_id: i64,
    pub exchange: String,
    pub routing_key: String,
}

impl From<&BlogSettings> for NotificationSettings {
    fn from(settings: &BlogSettings) -> Self {
        Self {
            website_url: settings.website_url.clone(),
            admin_user_id: settings.admin_user_id,
            exchange: settings.exchange.clone(),
            routing_key: settings.routing_key.clone(),
        }
    }
}

/// Builds and publishes comment notification emails.
///
/// Owns its collaborators so it can outlive the request that saved the comment.
pub struct NotificationDispatcher {
    article_repo: Arc<dyn ArticleRepository>,
    talk_repo: Arc<dyn TalkRepository>,
    user_info_repo: Arc<dyn UserInfoRepository>,
    publisher: Arc<dyn MessageQueuePublisher>,
    settings: NotificationSettings,
}

impl NotificationDispatcher {
    pub fn new(
        article_repo: Arc<dyn ArticleRepository>,
        talk_repo: Arc<dyn TalkRepository>,
        user_info_repo: Arc<dyn UserInfoRepository>,
        publisher: Arc<dyn MessageQueuePublisher>,
        settings: NotificationSettings,
    ) -> Self {
        Self {
            article_repo,
            talk_repo,
            user_info_repo,
            publisher,
            settings,
        }
    }

    pub fn settings(&self) -> &NotificationSettings {
        &self.settings
    }

    /// Build the email for `comment` and publish it, returning what was sent
    #[instrument(skip(self, comment), fields(comment_id = comment.id))]
    pub async fn notify(&self, comment: &Comment) -> ServiceResult<EmailJob> {
        let job = self.build_job(comment).await?;
        let payload = job
            .to_json()
            .map_err(|e| ServiceError::internal(format!("encoding email job: {e}")))?;

        self.publisher
            .publish(&self.settings.exchange, &self.settings.routing_key, &payload)
            .await?;

        info!(subject = %job.subject, "Comment notification queued");
        Ok(job)
    }

    /// User who should hear about a published comment.
    ///
    /// The reply target wins; otherwise the author of the commented article or talk.
    pub async fn resolve_recipient(&self, comment: &Comment) -> ServiceResult<i64> {
        if let Some(user_id) = comment.reply_target() {
            return Ok(user_id);
        }

        let no_recipient = || ServiceError::NoRecipientEmail { user_id: None };

        let author_id = match comment.comment_type {
            CommentType::Article => {
                let topic_id = comment.topic_id.ok_or_else(no_recipient)?;
                self.article_repo
                    .find_by_id(topic_id)
                    .await?
                    .ok_or_else(no_recipient)?
                    .user_id
            }
            CommentType::Talk => {
                let topic_id = comment.topic_id.ok_or_else(no_recipient)?;
                self.talk_repo
                    .find_by_id(topic_id)
                    .await?
                    .ok_or_else(no_recipient)?
                    .user_id
            }
            other @ CommentType::Link => {
                return Err(ServiceError::UnsupportedCommentType(other));
            }
        };

        if author_id == 0 {
            return Err(no_recipient());
        }
        Ok(author_id)
    }

    /// Email for `comment` without publishing it
    pub async fn build_job(&self, comment: &Comment) -> ServiceResult<EmailJob> {
        if !comment.is_published() {
            let email = self.email_of(self.settings.admin_user_id).await?;
            return Ok(EmailJob::new(
                email,
                MODERATION_REMINDER_SUBJECT,
                MODERATION_REMINDER_BODY,
            ));
        }

        let recipient = self.resolve_recipient(comment).await?;
        let email = self.email_of(recipient).await?;
        debug!(recipient, "Notification recipient resolved");

        let url = self.comment_url(comment);
        Ok(EmailJob::new(
            email,
            COMMENT_REMINDER_SUBJECT,
            format!("You have received a new reply, please visit {url} to read it"),
        ))
    }

    /// Page the comment lives on
    pub fn comment_url(&self, comment: &Comment) -> String {
        let topic = comment
            .topic_id
            .map(|id| id.to_string())
            .unwrap_or_default();
        format!(
            "{}{}{topic}",
            self.settings.website_url,
            comment.comment_type.path()
        )
    }

    async fn email_of(&self, user_id: i64) -> ServiceResult<String> {
        let user = self
            .user_info_repo
            .find_by_id(user_id)
            .await?
            .ok_or(ServiceError::NoRecipientEmail {
                user_id: Some(user_id),
            })?;

        user.contact_email()
            .map(ToString::to_string)
            .ok_or(ServiceError::NoRecipientEmail {
                user_id: Some(user_id),
            })
    }
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("settings", &self.settings)
            .finish()
    }
}
