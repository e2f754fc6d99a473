//! Ports implemented by the infrastructure crates

mod repositories;
mod stores;

pub use repositories::{
    ArticleRepository, CommentRepository, GuestbookRepository, RepoResult, TalkRepository,
    UserInfoRepository, WebsiteConfigRepository,
};
pub use stores::{GeoLocator, KeyValueStore, MessageQueuePublisher, WebsiteConfigProvider};
