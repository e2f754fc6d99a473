//! Website configuration
//!
//! The configuration document lives in PostgreSQL and is cached in Redis under
//! one key. Reads fall back to the database when the cache is cold or broken;
//! writes go to the database and then drop the cached copy.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use blog_cache::keys;
use blog_core::traits::{KeyValueStore, WebsiteConfigProvider, WebsiteConfigRepository};
use blog_core::{RepoResult, WebsiteConfig};
use tracing::{debug, info, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Read-through cache over the stored website configuration
pub struct CachedWebsiteConfigProvider {
    repo: Arc<dyn WebsiteConfigRepository>,
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
}

impl CachedWebsiteConfigProvider {
    pub fn new(
        repo: Arc<dyn WebsiteConfigRepository>,
        store: Arc<dyn KeyValueStore>,
        ttl: Duration,
    ) -> Self {
        Self { repo, store, ttl }
    }

    async fn cached(&self) -> Option<WebsiteConfig> {
        let raw = match self.store.get(keys::WEBSITE_CONFIG).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "Website config cache unreadable, using database");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!(error = %e, "Cached website config is corrupt, using database");
                None
            }
        }
    }

    async fn fill(&self, config: &WebsiteConfig) {
        let raw = match serde_json::to_string(config) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Failed to encode website config for cache");
                return;
            }
        };

        if let Err(e) = self
            .store
            .set(keys::WEBSITE_CONFIG, &raw, Some(self.ttl))
            .await
        {
            warn!(error = %e, "Failed to cache website config");
        }
    }
}

#[async_trait]
impl WebsiteConfigProvider for CachedWebsiteConfigProvider {
    async fn get_config(&self) -> RepoResult<WebsiteConfig> {
        if let Some(config) = self.cached().await {
            return Ok(config);
        }

        let config = match self.repo.find().await? {
            Some(config) => config,
            None => {
                debug!("No stored website config, using defaults");
                WebsiteConfig::default()
            }
        };

        self.fill(&config).await;
        Ok(config)
    }

    async fn invalidate(&self) -> RepoResult<()> {
        self.store.delete(keys::WEBSITE_CONFIG).await?;
        Ok(())
    }
}

impl std::fmt::Debug for CachedWebsiteConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedWebsiteConfigProvider")
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Website configuration service
pub struct WebsiteService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> WebsiteService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn get_config(&self) -> ServiceResult<WebsiteConfig> {
        Ok(self.ctx.config_provider().get_config().await?)
    }

    /// Replace the configuration (admin only); the next read sees the new document
    #[instrument(skip(self, config))]
    pub async fn update_config(
        &self,
        actor: Option<i64>,
        config: WebsiteConfig,
    ) -> ServiceResult<WebsiteConfig> {
        let user_id = self.ctx.require_admin(actor, "update the website configuration")?;

        self.ctx.website_config_repo().save(&config).await?;
        self.ctx.config_provider().invalidate().await?;

        info!(
            user_id,
            comment_review = config.is_comment_review,
            message_review = config.is_message_review,
            email_notice = config.is_email_notice,
            "Website config updated"
        );
        Ok(config)
    }
}
