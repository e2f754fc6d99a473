//! Database models - SQLx-compatible structs for PostgreSQL tables

mod comment;
mod guestbook;
mod topic;
mod website_config;

pub use comment::CommentModel;
pub use guestbook::GuestbookMessageModel;
pub use topic::{ArticleModel, TalkModel, UserInfoModel};
pub use website_config::WebsiteConfigModel;
