//! Service context - dependency container for services
//!
//! Holds the repositories, stores and long-lived helpers every service borrows.
//! All collaborators sit behind the `blog-core` port traits so the same context
//! runs against PostgreSQL/Redis in production and in-memory fakes in tests.

use std::sync::Arc;

use blog_cache::SharedRedisPool;
use blog_common::{AppConfig, JwtService};
use blog_core::traits::{
    ArticleRepository, CommentRepository, GeoLocator, GuestbookRepository, KeyValueStore,
    MessageQueuePublisher, TalkRepository, UserInfoRepository, WebsiteConfigProvider,
    WebsiteConfigRepository,
};
use blog_db::PgPool;

use super::dispatch::{NotificationWorkerPool, WorkerPoolConfig};
use super::error::{ServiceError, ServiceResult};
use super::filter::ContentFilter;
use super::notification::{NotificationDispatcher, NotificationSettings};
use super::views::ArticleViewGuard;

/// Site identity and notification routing
#[derive(Debug, Clone)]
pub struct BlogSettings {
    /// Base URL for deep links in emails, without trailing slash
    pub website_url: String,
    /// Blog owner; receives moderation reminders and may use admin operations
    pub admin_user_id: i64,
    pub exchange: String,
    pub routing_key: String,
    pub notify_workers: usize,
    pub notify_queue_capacity: usize,
}

impl Default for BlogSettings {
    fn default() -> Self {
        Self {
            website_url: "http://localhost:8080".to_string(),
            admin_user_id: 1,
            exchange: "email_exchange".to_string(),
            routing_key: "email".to_string(),
            notify_workers: 2,
            notify_queue_capacity: 1024,
        }
    }
}

impl From<&AppConfig> for BlogSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            website_url: config.blog.website_url.clone(),
            admin_user_id: config.blog.admin_user_id,
            exchange: config.notification.exchange.clone(),
            routing_key: config.notification.routing_key.clone(),
            notify_workers: config.notification.workers,
            notify_queue_capacity: config.notification.queue_capacity,
        }
    }
}

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    // Infrastructure handles, present when running against real stores
    pool: Option<PgPool>,
    redis_pool: Option<SharedRedisPool>,

    // Repositories
    comment_repo: Arc<dyn CommentRepository>,
    guestbook_repo: Arc<dyn GuestbookRepository>,
    article_repo: Arc<dyn ArticleRepository>,
    talk_repo: Arc<dyn TalkRepository>,
    user_info_repo: Arc<dyn UserInfoRepository>,
    website_config_repo: Arc<dyn WebsiteConfigRepository>,

    // Stores
    kv_store: Arc<dyn KeyValueStore>,
    config_provider: Arc<dyn WebsiteConfigProvider>,
    geo_locator: Arc<dyn GeoLocator>,

    // Owned helpers
    view_guard: Arc<ArticleViewGuard>,
    content_filter: Arc<ContentFilter>,
    dispatcher: Arc<NotificationDispatcher>,
    notifications: Arc<NotificationWorkerPool>,
    jwt_service: Arc<JwtService>,

    settings: Arc<BlogSettings>,
}

impl ServiceContext {
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Infrastructure ===

    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    pub fn redis_pool(&self) -> Option<&SharedRedisPool> {
        self.redis_pool.as_ref()
    }

    // === Repositories ===

    pub fn comment_repo(&self) -> &dyn CommentRepository {
        self.comment_repo.as_ref()
    }

    pub fn guestbook_repo(&self) -> &dyn GuestbookRepository {
        self.guestbook_repo.as_ref()
    }

    pub fn article_repo(&self) -> &dyn ArticleRepository {
        self.article_repo.as_ref()
    }

    pub fn talk_repo(&self) -> &dyn TalkRepository {
        self.talk_repo.as_ref()
    }

    pub fn user_info_repo(&self) -> &dyn UserInfoRepository {
        self.user_info_repo.as_ref()
    }

    pub fn website_config_repo(&self) -> &dyn WebsiteConfigRepository {
        self.website_config_repo.as_ref()
    }

    // === Stores ===

    pub fn kv_store(&self) -> &dyn KeyValueStore {
        self.kv_store.as_ref()
    }

    pub fn config_provider(&self) -> &dyn WebsiteConfigProvider {
        self.config_provider.as_ref()
    }

    pub fn geo_locator(&self) -> &dyn GeoLocator {
        self.geo_locator.as_ref()
    }

    // === Helpers ===

    pub fn view_guard(&self) -> &ArticleViewGuard {
        &self.view_guard
    }

    pub fn content_filter(&self) -> &ContentFilter {
        &self.content_filter
    }

    /// Synchronous access to recipient resolution and publishing
    pub fn dispatcher(&self) -> &NotificationDispatcher {
        &self.dispatcher
    }

    /// Background notification queue
    pub fn notifications(&self) -> &NotificationWorkerPool {
        &self.notifications
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    pub fn settings(&self) -> &BlogSettings {
        &self.settings
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        user_id == self.settings.admin_user_id
    }

    /// Fail unless `actor` is the blog owner
    pub fn require_admin(&self, actor: Option<i64>, action: &str) -> ServiceResult<i64> {
        let user_id = actor.ok_or(ServiceError::Unauthenticated)?;
        if self.is_admin(user_id) {
            Ok(user_id)
        } else {
            Err(ServiceError::permission_denied(action))
        }
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &self.pool.is_some())
            .field("redis_pool", &self.redis_pool.is_some())
            .field("settings", &self.settings)
            .field("repositories", &"...")
            .finish()
    }
}

/// Builder for creating ServiceContext
///
/// `build` starts the notification workers, so it must run inside a Tokio runtime.
#[derive(Default)]
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    redis_pool: Option<SharedRedisPool>,
    comment_repo: Option<Arc<dyn CommentRepository>>,
    guestbook_repo: Option<Arc<dyn GuestbookRepository>>,
    article_repo: Option<Arc<dyn ArticleRepository>>,
    talk_repo: Option<Arc<dyn TalkRepository>>,
    user_info_repo: Option<Arc<dyn UserInfoRepository>>,
    website_config_repo: Option<Arc<dyn WebsiteConfigRepository>>,
    kv_store: Option<Arc<dyn KeyValueStore>>,
    config_provider: Option<Arc<dyn WebsiteConfigProvider>>,
    geo_locator: Option<Arc<dyn GeoLocator>>,
    publisher: Option<Arc<dyn MessageQueuePublisher>>,
    content_filter: Option<ContentFilter>,
    jwt_service: Option<Arc<JwtService>>,
    settings: Option<BlogSettings>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn redis_pool(mut self, redis_pool: SharedRedisPool) -> Self {
        self.redis_pool = Some(redis_pool);
        self
    }

    pub fn comment_repo(mut self, repo: Arc<dyn CommentRepository>) -> Self {
        self.comment_repo = Some(repo);
        self
    }

    pub fn guestbook_repo(mut self, repo: Arc<dyn GuestbookRepository>) -> Self {
        self.guestbook_repo = Some(repo);
        self
    }

    pub fn article_repo(mut self, repo: Arc<dyn ArticleRepository>) -> Self {
        self.article_repo = Some(repo);
        self
    }

    pub fn talk_repo(mut self, repo: Arc<dyn TalkRepository>) -> Self {
        self.talk_repo = Some(repo);
        self
    }

    pub fn user_info_repo(mut self, repo: Arc<dyn UserInfoRepository>) -> Self {
        self.user_info_repo = Some(repo);
        self
    }

    pub fn website_config_repo(mut self, repo: Arc<dyn WebsiteConfigRepository>) -> Self {
        self.website_config_repo = Some(repo);
        self
    }

    pub fn kv_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.kv_store = Some(store);
        self
    }

    pub fn config_provider(mut self, provider: Arc<dyn WebsiteConfigProvider>) -> Self {
        self.config_provider = Some(provider);
        self
    }

    pub fn geo_locator(mut self, locator: Arc<dyn GeoLocator>) -> Self {
        self.geo_locator = Some(locator);
        self
    }

    pub fn publisher(mut self, publisher: Arc<dyn MessageQueuePublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Defaults to a filter with no sensitive words
    pub fn content_filter(mut self, filter: ContentFilter) -> Self {
        self.content_filter = Some(filter);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    /// Defaults to [`BlogSettings::default`]
    pub fn settings(mut self, settings: BlogSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing,
    /// `ServiceError::Internal` when called outside a Tokio runtime
    pub fn build(self) -> ServiceResult<ServiceContext> {
        fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
            value.ok_or_else(|| ServiceError::validation(format!("{name} is required")))
        }

        let settings = self.settings.unwrap_or_default();
        let article_repo = required(self.article_repo, "article_repo")?;
        let talk_repo = required(self.talk_repo, "talk_repo")?;
        let user_info_repo = required(self.user_info_repo, "user_info_repo")?;
        let publisher = required(self.publisher, "publisher")?;
        let jwt_service = required(self.jwt_service, "jwt_service")?;

        let dispatcher = Arc::new(NotificationDispatcher::new(
            article_repo.clone(),
            talk_repo.clone(),
            user_info_repo.clone(),
            publisher,
            NotificationSettings::from(&settings),
        ));

        let ctx = ServiceContext {
            pool: self.pool,
            redis_pool: self.redis_pool,
            comment_repo: required(self.comment_repo, "comment_repo")?,
            guestbook_repo: required(self.guestbook_repo, "guestbook_repo")?,
            article_repo,
            talk_repo,
            user_info_repo,
            website_config_repo: required(self.website_config_repo, "website_config_repo")?,
            kv_store: required(self.kv_store, "kv_store")?,
            config_provider: required(self.config_provider, "config_provider")?,
            geo_locator: required(self.geo_locator, "geo_locator")?,
            view_guard: Arc::new(ArticleViewGuard::new()),
            content_filter: Arc::new(self.content_filter.unwrap_or_default()),
            notifications: Arc::new(NotificationWorkerPool::start(
                dispatcher.clone(),
                WorkerPoolConfig {
                    workers: settings.notify_workers,
                    capacity: settings.notify_queue_capacity,
                },
            )?),
            dispatcher,
            jwt_service,
            settings: Arc::new(settings),
        };

        Ok(ctx)
    }
}
