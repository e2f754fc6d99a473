//! PostgreSQL implementation of WebsiteConfigRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use blog_core::traits::{RepoResult, WebsiteConfigRepository};
use blog_core::{DomainError, WebsiteConfig};

use crate::models::WebsiteConfigModel;

use super::error::map_db_error;

/// The configuration lives in one row
const CONFIG_ROW_ID: i32 = 1;

#[derive(Clone)]
pub struct PgWebsiteConfigRepository {
    pool: PgPool,
}

impl PgWebsiteConfigRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WebsiteConfigRepository for PgWebsiteConfigRepository {
    #[instrument(skip(self))]
    async fn find(&self) -> RepoResult<Option<WebsiteConfig>> {
        let result = sqlx::query_as::<_, WebsiteConfigModel>(
            "SELECT id, config FROM website_config WHERE id = $1",
        )
        .bind(CONFIG_ROW_ID)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(WebsiteConfig::try_from).transpose()
    }

    #[instrument(skip(self, config))]
    async fn save(&self, config: &WebsiteConfig) -> RepoResult<()> {
        let document = serde_json::to_value(config)
            .map_err(|e| DomainError::InternalError(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO website_config (id, config, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (id) DO UPDATE
            SET config = EXCLUDED.config, updated_at = NOW()
            "#,
        )
        .bind(CONFIG_ROW_ID)
        .bind(document)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}
