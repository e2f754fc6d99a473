//! # blog-core
//!
//! Domain layer for the blog engagement backend: comments, guestbook messages,
//! website configuration, like/view value objects, and the ports (traits) the
//! application layer talks to. Nothing in here knows about Redis, PostgreSQL or HTTP.

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Article, Comment, CommentType, EmailJob, GuestbookMessage, NewComment, NewGuestbookMessage,
    Talk, UserInfo, WebsiteConfig,
};
pub use error::DomainError;
pub use traits::{
    ArticleRepository, CommentRepository, GeoLocator, GuestbookRepository, KeyValueStore,
    MessageQueuePublisher, RepoResult, TalkRepository, UserInfoRepository,
    WebsiteConfigProvider, WebsiteConfigRepository,
};
pub use value_objects::{ContentKind, EntityKind, Fingerprint, VisitorInfo};
