//! PostgreSQL implementation of GuestbookRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use blog_core::traits::{GuestbookRepository, RepoResult};
use blog_core::{GuestbookMessage, NewGuestbookMessage};

use crate::models::GuestbookMessageModel;

use super::error::map_db_error;

#[derive(Clone)]
pub struct PgGuestbookRepository {
    pool: PgPool,
}

impl PgGuestbookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GuestbookRepository for PgGuestbookRepository {
    #[instrument(skip(self, message))]
    async fn insert(&self, message: &NewGuestbookMessage) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO guestbook_messages
                (nickname, avatar, message_content, ip_address, ip_source, speed, is_review)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&message.nickname)
        .bind(&message.avatar)
        .bind(&message.content)
        .bind(&message.ip_address)
        .bind(&message.ip_source)
        .bind(message.speed)
        .bind(message.is_review)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<GuestbookMessage>> {
        let result = sqlx::query_as::<_, GuestbookMessageModel>(
            r#"
            SELECT id, nickname, avatar, message_content, ip_address, ip_source,
                   speed, is_review, created_at, updated_at
            FROM guestbook_messages
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(GuestbookMessage::from))
    }

    #[instrument(skip(self))]
    async fn update_review_status(&self, ids: &[i64], is_review: bool) -> RepoResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE guestbook_messages
            SET is_review = $1, updated_at = NOW()
            WHERE id = ANY($2)
            "#,
        )
        .bind(is_review)
        .bind(ids)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn remove_by_ids(&self, ids: &[i64]) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM guestbook_messages WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
