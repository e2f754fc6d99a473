//! Read-only lookups for articles, talks and user info

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use blog_core::traits::{ArticleRepository, RepoResult, TalkRepository, UserInfoRepository};
use blog_core::{Article, Talk, UserInfo};

use crate::models::{ArticleModel, TalkModel, UserInfoModel};

use super::error::map_db_error;

#[derive(Clone)]
pub struct PgArticleRepository {
    pool: PgPool,
}

impl PgArticleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArticleRepository for PgArticleRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Article>> {
        let result = sqlx::query_as::<_, ArticleModel>(
            "SELECT id, user_id, article_title FROM articles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Article::from))
    }
}

#[derive(Clone)]
pub struct PgTalkRepository {
    pool: PgPool,
}

impl PgTalkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TalkRepository for PgTalkRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Talk>> {
        let result = sqlx::query_as::<_, TalkModel>("SELECT id, user_id FROM talks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.map(Talk::from))
    }
}

#[derive(Clone)]
pub struct PgUserInfoRepository {
    pool: PgPool,
}

impl PgUserInfoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserInfoRepository for PgUserInfoRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<UserInfo>> {
        let result = sqlx::query_as::<_, UserInfoModel>(
            "SELECT id, nickname, email, avatar FROM user_info WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(UserInfo::from))
    }
}
