//! PostgreSQL implementation of CommentRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use blog_core::traits::{CommentRepository, RepoResult};
use blog_core::{Comment, NewComment};

use crate::models::CommentModel;

use super::error::map_db_error;

#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    #[instrument(skip(self, comment), fields(user_id = comment.user_id))]
    async fn insert(&self, comment: &NewComment) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO comments
                (user_id, reply_user_id, topic_id, parent_id, comment_type, comment_content, is_review)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(comment.user_id)
        .bind(comment.reply_user_id)
        .bind(comment.topic_id)
        .bind(comment.parent_id)
        .bind(comment.comment_type.as_i32())
        .bind(&comment.content)
        .bind(comment.is_review)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Comment>> {
        let result = sqlx::query_as::<_, CommentModel>(
            r#"
            SELECT id, user_id, reply_user_id, topic_id, parent_id, comment_type,
                   comment_content, is_review, created_at, updated_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Comment::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn update_review_status(&self, ids: &[i64], is_review: bool) -> RepoResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE comments
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
        let result = sqlx::query(
            r#"
            DELETE FROM comments
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
