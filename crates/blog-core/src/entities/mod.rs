//! Domain entities - core business objects

mod comment;
mod guestbook;
mod notification;
mod topic;
mod website_config;

pub use comment::{Comment, CommentType, NewComment};
pub use guestbook::{GuestbookMessage, NewGuestbookMessage};
pub use notification::EmailJob;
pub use topic::{Article, Talk, UserInfo};
pub use website_config::WebsiteConfig;
