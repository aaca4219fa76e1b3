/*
 * Responsibility
 * - comments CRUD, always scoped by post_id
 * - a comment id under the wrong post behaves like a missing row
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct CommentRow {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    // users.username
    pub author: String,
    pub text: String,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: i64,
    pub author_id: i64,
    pub text: String,
}

#[async_trait]
pub trait CommentRepo: Send + Sync {
    async fn list_by_post(&self, post_id: i64) -> RepoResult<Vec<CommentRow>>;
    async fn get(&self, post_id: i64, comment_id: i64) -> RepoResult<Option<CommentRow>>;
    async fn create(&self, new: NewComment) -> RepoResult<CommentRow>;
    async fn update(
        &self,
        post_id: i64,
        comment_id: i64,
        text: Option<String>,
    ) -> RepoResult<Option<CommentRow>>;
    async fn delete(&self, post_id: i64, comment_id: i64) -> RepoResult<bool>;
}

#[derive(Clone, Debug)]
pub struct PgCommentRepo {
    pool: PgPool,
}

impl PgCommentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepo for PgCommentRepo {
    async fn list_by_post(&self, post_id: i64) -> RepoResult<Vec<CommentRow>> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT c.id, c.post_id, c.author_id, u.username AS author, c.text, c.created
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.post_id = $1
            ORDER BY c.id
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn get(&self, post_id: i64, comment_id: i64) -> RepoResult<Option<CommentRow>> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT c.id, c.post_id, c.author_id, u.username AS author, c.text, c.created
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.id = $1 AND c.post_id = $2
            "#,
        )
        .bind(comment_id)
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create(&self, new: NewComment) -> RepoResult<CommentRow> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            WITH inserted AS (
                INSERT INTO comments (post_id, author_id, text)
                VALUES ($1, $2, $3)
                RETURNING id, post_id, author_id, text, created
            )
            SELECT c.id, c.post_id, c.author_id, u.username AS author, c.text, c.created
            FROM inserted c
            JOIN users u ON u.id = c.author_id
            "#,
        )
        .bind(new.post_id)
        .bind(new.author_id)
        .bind(&new.text)
        .fetch_one(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row)
    }

    async fn update(
        &self,
        post_id: i64,
        comment_id: i64,
        text: Option<String>,
    ) -> RepoResult<Option<CommentRow>> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            WITH updated AS (
                UPDATE comments
                SET text = COALESCE($3, text)
                WHERE id = $1 AND post_id = $2
                RETURNING id, post_id, author_id, text, created
            )
            SELECT c.id, c.post_id, c.author_id, u.username AS author, c.text, c.created
            FROM updated c
            JOIN users u ON u.id = c.author_id
            "#,
        )
        .bind(comment_id)
        .bind(post_id)
        .bind(text.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn delete(&self, post_id: i64, comment_id: i64) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM comments
            WHERE id = $1 AND post_id = $2
            "#,
        )
        .bind(comment_id)
        .bind(post_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
