//! Postgres repository for the `projects` table.

use std::collections::HashMap;

use depot_core::pagination::PageWindow;
use depot_core::types::DbId;
use sqlx::types::Json;
use sqlx::FromRow;

use crate::error::StoreResult;
use crate::models::project::{
    NewProject, Project, ProjectFilter, ProjectPatch, ProjectSortBy, SortOrder,
};
use crate::models::tag::Tag;
use crate::repositories::traits::ProjectStore;
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, slug, description, image_url, emoji, status, owner_id, \
     lifecycle_stages, metadata, created_at, updated_at";

/// Shared WHERE clause for the list filters. `$1`..`$4` are owner, status,
/// search pattern, and tag id list; each is skipped when bound to NULL.
const LIST_FILTER: &str = "deleted_at IS NULL \
     AND ($1::uuid IS NULL OR owner_id = $1) \
     AND ($2::project_status IS NULL OR status = $2) \
     AND ($3::text IS NULL OR name ILIKE $3 OR slug ILIKE $3 OR description ILIKE $3) \
     AND ($4::uuid[] IS NULL OR EXISTS (\
         SELECT 1 FROM project_tags pt \
         WHERE pt.project_id = projects.id AND pt.tag_id = ANY($4)))";

/// Provides CRUD operations for projects and their tag associations.
#[derive(Debug, Clone)]
pub struct ProjectRepository {
    pool: DbPool,
}

impl ProjectRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Load tags for the given projects with a single query.
    async fn load_tags(&self, projects: &mut [Project]) -> Result<(), sqlx::Error> {
        if projects.is_empty() {
            return Ok(());
        }

        #[derive(FromRow)]
        struct ProjectTagRow {
            project_id: DbId,
            #[sqlx(flatten)]
            tag: Tag,
        }

        let ids: Vec<DbId> = projects.iter().map(|p| p.id).collect();
        let rows = sqlx::query_as::<_, ProjectTagRow>(
            "SELECT pt.project_id, t.id, t.name, t.description, t.color, \
                    t.created_at, t.updated_at \
             FROM project_tags pt \
             JOIN tags t ON t.id = pt.tag_id \
             WHERE pt.project_id = ANY($1) \
             ORDER BY t.created_at",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_project: HashMap<DbId, Vec<Tag>> = HashMap::new();
        for row in rows {
            by_project.entry(row.project_id).or_default().push(row.tag);
        }
        for project in projects {
            project.tags = by_project.remove(&project.id).unwrap_or_default();
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ProjectStore for ProjectRepository {
    async fn list(
        &self,
        filter: &ProjectFilter,
        window: PageWindow,
    ) -> StoreResult<(Vec<Project>, i64)> {
        let search = filter.search.as_ref().map(|s| format!("%{s}%"));
        let tag_ids = filter.tag_ids.as_deref();

        let count_query = format!("SELECT COUNT(*) FROM projects WHERE {LIST_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(filter.owner_id)
            .bind(filter.status)
            .bind(&search)
            .bind(tag_ids)
            .fetch_one(&self.pool)
            .await?;

        let order_column = filter
            .sort_by
            .unwrap_or(ProjectSortBy::CreatedAt)
            .column();
        let order_dir = filter.sort_order.unwrap_or(SortOrder::Desc).sql();
        let page_query = format!(
            "SELECT {COLUMNS} FROM projects WHERE {LIST_FILTER} \
             ORDER BY {order_column} {order_dir} LIMIT $5 OFFSET $6"
        );
        let mut projects = sqlx::query_as::<_, Project>(&page_query)
            .bind(filter.owner_id)
            .bind(filter.status)
            .bind(&search)
            .bind(tag_ids)
            .bind(window.take)
            .bind(window.skip)
            .fetch_all(&self.pool)
            .await?;

        self.load_tags(&mut projects).await?;
        Ok((projects, total))
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Project>> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1 AND deleted_at IS NULL");
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match project {
            Some(mut project) => {
                self.load_tags(std::slice::from_mut(&mut project)).await?;
                Ok(Some(project))
            }
            None => Ok(None),
        }
    }

    async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<Project>> {
        let query =
            format!("SELECT {COLUMNS} FROM projects WHERE slug = $1 AND deleted_at IS NULL");
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        match project {
            Some(mut project) => {
                self.load_tags(std::slice::from_mut(&mut project)).await?;
                Ok(Some(project))
            }
            None => Ok(None),
        }
    }

    async fn create(&self, new: &NewProject) -> StoreResult<Project> {
        let query = format!(
            "INSERT INTO projects \
                 (name, slug, description, image_url, emoji, status, owner_id, \
                  lifecycle_stages, metadata) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(&new.name)
            .bind(&new.slug)
            .bind(&new.description)
            .bind(&new.image_url)
            .bind(&new.emoji)
            .bind(new.status)
            .bind(new.owner_id)
            .bind(Json(&new.lifecycle_stages))
            .bind(Json(&new.metadata))
            .fetch_one(&self.pool)
            .await?;
        Ok(project)
    }

    async fn update(&self, id: DbId, patch: &ProjectPatch) -> StoreResult<Option<Project>> {
        let query = format!(
            "UPDATE projects SET \
                 name = COALESCE($2, name), \
                 slug = COALESCE($3, slug), \
                 description = COALESCE($4, description), \
                 image_url = COALESCE($5, image_url), \
                 emoji = COALESCE($6, emoji), \
                 status = COALESCE($7, status), \
                 owner_id = COALESCE($8, owner_id), \
                 lifecycle_stages = COALESCE($9, lifecycle_stages), \
                 metadata = COALESCE($10, metadata), \
                 updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&patch.name)
            .bind(&patch.slug)
            .bind(&patch.description)
            .bind(&patch.image_url)
            .bind(&patch.emoji)
            .bind(patch.status)
            .bind(patch.owner_id)
            .bind(patch.lifecycle_stages.as_ref().map(Json))
            .bind(patch.metadata.as_ref().map(Json))
            .fetch_optional(&self.pool)
            .await?;
        Ok(project)
    }

    async fn soft_delete(&self, id: DbId) -> StoreResult<bool> {
        let result =
            sqlx::query("UPDATE projects SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, id: DbId) -> StoreResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM projects WHERE id = $1 AND deleted_at IS NULL)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn is_slug_unique(&self, slug: &str, exclude_id: Option<DbId>) -> StoreResult<bool> {
        let unique: bool = sqlx::query_scalar(
            "SELECT NOT EXISTS (\
                 SELECT 1 FROM projects \
                 WHERE slug = $1 AND deleted_at IS NULL \
                   AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(unique)
    }

    async fn set_tags(&self, project_id: DbId, tag_ids: &[DbId]) -> StoreResult<()> {
        // Replace, not merge: clear the association rows, then re-insert.
        // The two statements are deliberately not wrapped in a transaction;
        // see the service-layer notes on multi-step operations.
        sqlx::query("DELETE FROM project_tags WHERE project_id = $1")
            .bind(project_id)
            .execute(&self.pool)
            .await?;

        if !tag_ids.is_empty() {
            sqlx::query(
                "INSERT INTO project_tags (project_id, tag_id) \
                 SELECT $1, unnest($2::uuid[])",
            )
            .bind(project_id)
            .bind(tag_ids)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }
}
