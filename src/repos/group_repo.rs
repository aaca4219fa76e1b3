/*
 * Responsibility
 * - groups are read-only through the API: list + get
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct GroupRow {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

#[async_trait]
pub trait GroupRepo: Send + Sync {
    async fn list(&self) -> RepoResult<Vec<GroupRow>>;
    async fn get(&self, group_id: i64) -> RepoResult<Option<GroupRow>>;
}

#[derive(Clone, Debug)]
pub struct PgGroupRepo {
    pool: PgPool,
}

impl PgGroupRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GroupRepo for PgGroupRepo {
    async fn list(&self) -> RepoResult<Vec<GroupRow>> {
        let rows = sqlx::query_as::<_, GroupRow>(
            r#"
            SELECT id, title, slug, description
            FROM groups
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn get(&self, group_id: i64) -> RepoResult<Option<GroupRow>> {
        let row = sqlx::query_as::<_, GroupRow>(
            r#"
            SELECT id, title, slug, description
            FROM groups
            WHERE id = $1
            "#,
        )
        .bind(group_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
