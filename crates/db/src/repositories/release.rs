//! Postgres repository for the `releases` table.

use depot_core::pagination::PageWindow;
use depot_core::types::DbId;
use sqlx::types::Json;

use crate::error::StoreResult;
use crate::models::release::{NewRelease, Release, ReleaseFilter, UpdateRelease};
use crate::repositories::traits::ReleaseStore;
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, version, snapshot_id, status, changelog, notes, \
     structure, metadata, created_at, updated_at";

/// Shared WHERE clause for the list filters. `$1` is the owning project,
/// `$2`/`$3` the optional status and version filters.
const LIST_FILTER: &str = "project_id = $1 AND deleted_at IS NULL \
     AND ($2::release_status IS NULL OR status = $2) \
     AND ($3::text IS NULL OR version ILIKE $3)";

/// Provides CRUD operations for releases, always scoped to live rows.
#[derive(Debug, Clone)]
pub struct ReleaseRepository {
    pool: DbPool,
}

impl ReleaseRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ReleaseStore for ReleaseRepository {
    async fn list(
        &self,
        project_id: DbId,
        filter: &ReleaseFilter,
        window: PageWindow,
    ) -> StoreResult<(Vec<Release>, i64)> {
        let version = filter.version.as_ref().map(|v| format!("%{v}%"));

        let count_query = format!("SELECT COUNT(*) FROM releases WHERE {LIST_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(project_id)
            .bind(filter.status)
            .bind(&version)
            .fetch_one(&self.pool)
            .await?;

        let page_query = format!(
            "SELECT {COLUMNS} FROM releases WHERE {LIST_FILTER} \
             ORDER BY created_at DESC LIMIT $4 OFFSET $5"
        );
        let releases = sqlx::query_as::<_, Release>(&page_query)
            .bind(project_id)
            .bind(filter.status)
            .bind(&version)
            .bind(window.take)
            .bind(window.skip)
            .fetch_all(&self.pool)
            .await?;

        Ok((releases, total))
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Release>> {
        let query = format!("SELECT {COLUMNS} FROM releases WHERE id = $1 AND deleted_at IS NULL");
        let release = sqlx::query_as::<_, Release>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(release)
    }

    async fn create(&self, new: &NewRelease) -> StoreResult<Release> {
        let query = format!(
            "INSERT INTO releases \
                 (project_id, version, status, changelog, notes, structure, metadata) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        let release = sqlx::query_as::<_, Release>(&query)
            .bind(new.project_id)
            .bind(&new.version)
            .bind(new.status)
            .bind(&new.changelog)
            .bind(&new.notes)
            .bind(Json(&new.structure))
            .bind(Json(&new.metadata))
            .fetch_one(&self.pool)
            .await?;
        Ok(release)
    }

    async fn update(&self, id: DbId, patch: &UpdateRelease) -> StoreResult<Option<Release>> {
        let query = format!(
            "UPDATE releases SET \
                 status = COALESCE($2, status), \
                 snapshot_id = COALESCE($3, snapshot_id), \
                 changelog = COALESCE($4, changelog), \
                 notes = COALESCE($5, notes), \
                 structure = COALESCE($6, structure), \
                 metadata = COALESCE($7, metadata), \
                 updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );
        let release = sqlx::query_as::<_, Release>(&query)
            .bind(id)
            .bind(patch.status)
            .bind(patch.snapshot_id)
            .bind(&patch.changelog)
            .bind(&patch.notes)
            .bind(patch.structure.as_ref().map(Json))
            .bind(patch.metadata.as_ref().map(Json))
            .fetch_optional(&self.pool)
            .await?;
        Ok(release)
    }

    async fn soft_delete(&self, id: DbId) -> StoreResult<bool> {
        let result =
            sqlx::query("UPDATE releases SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn is_version_unique(
        &self,
        project_id: DbId,
        version: &str,
        exclude_id: Option<DbId>,
    ) -> StoreResult<bool> {
        let unique: bool = sqlx::query_scalar(
            "SELECT NOT EXISTS (\
                 SELECT 1 FROM releases \
                 WHERE project_id = $1 AND version = $2 AND deleted_at IS NULL \
                   AND ($3::uuid IS NULL OR id <> $3))",
        )
        .bind(project_id)
        .bind(version)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(unique)
    }
}
