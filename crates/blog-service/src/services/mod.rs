//! Business logic services
//!
//! Engagement counters, view tracking, the comment and guestbook pipelines,
//! moderation and the email notification fan-out.

pub mod comment;
pub mod context;
pub mod dispatch;
pub mod engagement;
pub mod error;
pub mod filter;
pub mod geo;
pub mod message;
pub mod moderation;
pub mod notification;
pub mod views;
pub mod website;

// Re-export all services for convenience
pub use comment::CommentService;
pub use context::{BlogSettings, ServiceContext, ServiceContextBuilder};
pub use dispatch::{NotificationWorkerPool, WorkerPoolConfig, WorkerPoolStats};
pub use engagement::EngagementService;
pub use error::{ServiceError, ServiceResult};
pub use filter::ContentFilter;
pub use geo::{DisabledGeoLocator, IpApiLocator};
pub use message::MessageService;
pub use moderation::{initial_review_state, requires_review};
pub use notification::{
    NotificationDispatcher, NotificationSettings, COMMENT_REMINDER_SUBJECT,
    MODERATION_REMINDER_SUBJECT,
};
pub use views::{normalize_region, ArticleViewGuard, ViewService, UNKNOWN_REGION};
pub use website::{CachedWebsiteConfigProvider, WebsiteService};
