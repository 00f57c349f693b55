//! Postgres repository for the `tags` table.

use depot_core::pagination::PageWindow;
use depot_core::types::DbId;

use crate::error::StoreResult;
use crate::models::tag::{CreateTag, Tag, TagFilter, UpdateTag};
use crate::repositories::traits::TagStore;
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, color, created_at, updated_at";

/// Provides CRUD operations for tags. Deletion is physical; the join rows in
/// `project_tags` go with it via the FK cascade.
#[derive(Debug, Clone)]
pub struct TagRepository {
    pool: DbPool,
}

impl TagRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl TagStore for TagRepository {
    async fn list(&self, filter: &TagFilter, window: PageWindow) -> StoreResult<(Vec<Tag>, i64)> {
        let search = filter.search.as_ref().map(|s| format!("%{s}%"));

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM tags WHERE ($1::text IS NULL OR name ILIKE $1)")
                .bind(&search)
                .fetch_one(&self.pool)
                .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM tags WHERE ($1::text IS NULL OR name ILIKE $1) \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        );
        let tags = sqlx::query_as::<_, Tag>(&query)
            .bind(&search)
            .bind(window.take)
            .bind(window.skip)
            .fetch_all(&self.pool)
            .await?;

        Ok((tags, total))
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Tag>> {
        let query = format!("SELECT {COLUMNS} FROM tags WHERE id = $1");
        let tag = sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(tag)
    }

    async fn create(&self, new: &CreateTag) -> StoreResult<Tag> {
        let query = format!(
            "INSERT INTO tags (name, description, color) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        let tag = sqlx::query_as::<_, Tag>(&query)
            .bind(&new.name)
            .bind(&new.description)
            .bind(&new.color)
            .fetch_one(&self.pool)
            .await?;
        Ok(tag)
    }

    async fn update(&self, id: DbId, patch: &UpdateTag) -> StoreResult<Option<Tag>> {
        let query = format!(
            "UPDATE tags SET \
                 name = COALESCE($2, name), \
                 description = COALESCE($3, description), \
                 color = COALESCE($4, color), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let tag = sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .bind(&patch.name)
            .bind(&patch.description)
            .bind(&patch.color)
            .fetch_optional(&self.pool)
            .await?;
        Ok(tag)
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn is_name_unique(&self, name: &str, exclude_id: Option<DbId>) -> StoreResult<bool> {
        let unique: bool = sqlx::query_scalar(
            "SELECT NOT EXISTS (\
                 SELECT 1 FROM tags WHERE name = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(unique)
    }
}
