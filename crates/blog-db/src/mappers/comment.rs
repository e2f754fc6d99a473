//! Comment model -> entity mapper

use blog_core::{Comment, CommentType, DomainError};

use crate::models::CommentModel;

impl TryFrom<CommentModel> for Comment {
    type Error = DomainError;

    fn try_from(model: CommentModel) -> Result<Self, Self::Error> {
        Ok(Comment {
            id: model.id,
            user_id: model.user_id,
            reply_user_id: model.reply_user_id,
            topic_id: model.topic_id,
            parent_id: model.parent_id,
            comment_type: CommentType::try_from(model.comment_type)?,
            content: model.comment_content,
            is_review: model.is_review,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
