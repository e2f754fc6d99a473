//! Repository implementations - PostgreSQL implementations of the blog-core ports

mod comment;
mod error;
mod guestbook;
mod topic;
mod website_config;

pub use comment::PgCommentRepository;
pub use guestbook::PgGuestbookRepository;
pub use topic::{PgArticleRepository, PgTalkRepository, PgUserInfoRepository};
pub use website_config::PgWebsiteConfigRepository;
