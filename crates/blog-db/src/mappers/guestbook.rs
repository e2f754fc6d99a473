//! Guestbook model -> entity mapper

use blog_core::GuestbookMessage;

use crate::models::GuestbookMessageModel;

impl From<GuestbookMessageModel> for GuestbookMessage {
    fn from(model: GuestbookMessageModel) -> Self {
        GuestbookMessage {
            id: model.id,
            nickname: model.nickname,
            avatar: model.avatar,
            content: model.message_content,
            ip_address: model.ip_address,
            ip_source: model.ip_source,
            speed: model.speed,
            is_review: model.is_review,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
