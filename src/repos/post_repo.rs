/*
 * Responsibility
 * - posts CRUD
 * - author username is resolved with a join so handlers never query users
 * - comments rely on the FK (ON DELETE CASCADE) when a post is deleted
 *
 * Assumed schema:
 *   posts.id (bigserial), posts.text (text), posts.pub_date (timestamptz default now()),
 *   posts.author_id (bigint -> users.id), posts.image (text, nullable),
 *   posts.group_id (bigint -> groups.id, nullable, ON DELETE SET NULL)
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct PostRow {
    pub id: i64,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: i64,
    // users.username
    pub author: String,
    pub image: Option<String>,
    pub group_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub text: String,
    pub author_id: i64,
    pub group_id: Option<i64>,
}

/// Fields left as `None` are not touched.
///
/// `group_id` is tri-state:
/// - None: keep
/// - Some(None): clear
/// - Some(Some(id)): set
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub text: Option<String>,
    pub group_id: Option<Option<i64>>,
}

#[async_trait]
pub trait PostRepo: Send + Sync {
    async fn list(&self) -> RepoResult<Vec<PostRow>>;
    async fn get(&self, post_id: i64) -> RepoResult<Option<PostRow>>;
    async fn create(&self, new: NewPost) -> RepoResult<PostRow>;
    async fn update(&self, post_id: i64, changes: PostChanges) -> RepoResult<Option<PostRow>>;
    async fn delete(&self, post_id: i64) -> RepoResult<bool>;
}

#[derive(Clone, Debug)]
pub struct PgPostRepo {
    pool: PgPool,
}

impl PgPostRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepo for PgPostRepo {
    async fn list(&self) -> RepoResult<Vec<PostRow>> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT
                p.id, p.text, p.pub_date, p.author_id, u.username AS author, p.image, p.group_id
            FROM posts p
            JOIN users u ON u.id = p.author_id
            ORDER BY p.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn get(&self, post_id: i64) -> RepoResult<Option<PostRow>> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT
                p.id, p.text, p.pub_date, p.author_id, u.username AS author, p.image, p.group_id
            FROM posts p
            JOIN users u ON u.id = p.author_id
            WHERE p.id = $1
            "#,
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn create(&self, new: NewPost) -> RepoResult<PostRow> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            WITH inserted AS (
                INSERT INTO posts (text, author_id, group_id)
                VALUES ($1, $2, $3)
                RETURNING id, text, pub_date, author_id, image, group_id
            )
            SELECT
                p.id, p.text, p.pub_date, p.author_id, u.username AS author, p.image, p.group_id
            FROM inserted p
            JOIN users u ON u.id = p.author_id
            "#,
        )
        .bind(&new.text)
        .bind(new.author_id)
        .bind(new.group_id)
        .fetch_one(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row)
    }

    async fn update(&self, post_id: i64, changes: PostChanges) -> RepoResult<Option<PostRow>> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            WITH updated AS (
                UPDATE posts
                SET
                    text = COALESCE($2, text),
                    group_id = CASE
                        WHEN $3 = false THEN group_id
                        ELSE $4
                    END
                WHERE id = $1
                RETURNING id, text, pub_date, author_id, image, group_id
            )
            SELECT
                p.id, p.text, p.pub_date, p.author_id, u.username AS author, p.image, p.group_id
            FROM updated p
            JOIN users u ON u.id = p.author_id
            "#,
        )
        .bind(post_id)
        .bind(changes.text.as_deref())
        .bind(changes.group_id.is_some()) // $3: flag to set group_id
        .bind(changes.group_id.flatten()) // $4: new group_id value
        .fetch_optional(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row)
    }

    async fn delete(&self, post_id: i64) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM posts
            WHERE id = $1
            "#,
        )
        .bind(post_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
