use depot_core::pagination::PageWindow;
use depot_core::types::DbId;

use crate::error::StoreResult;
use crate::models::project::{NewProject, Project, ProjectFilter, ProjectPatch};

/// Persistence operations for projects.
///
/// Every read excludes soft-deleted rows. `list` and the single-row finders
/// return projects with their tags loaded; `create` and `update` return the
/// bare row (callers reload when they need the associations).
#[async_trait::async_trait]
pub trait ProjectStore: Send + Sync + 'static {
    /// Filtered, sorted page of projects plus the total matching count.
    async fn list(
        &self,
        filter: &ProjectFilter,
        window: PageWindow,
    ) -> StoreResult<(Vec<Project>, i64)>;

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Project>>;

    async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<Project>>;

    async fn create(&self, new: &NewProject) -> StoreResult<Project>;

    /// Apply the non-`None` fields of `patch`. Returns `None` when no live
    /// row with the given id exists.
    async fn update(&self, id: DbId, patch: &ProjectPatch) -> StoreResult<Option<Project>>;

    /// Mark the row deleted. Returns `true` if a live row was affected.
    async fn soft_delete(&self, id: DbId) -> StoreResult<bool>;

    /// Existence probe over live rows, cheaper than loading the entity.
    async fn exists(&self, id: DbId) -> StoreResult<bool>;

    /// Whether `slug` is unused among live rows, optionally ignoring one id.
    async fn is_slug_unique(&self, slug: &str, exclude_id: Option<DbId>) -> StoreResult<bool>;

    /// Replace the project's tag set with exactly `tag_ids`.
    async fn set_tags(&self, project_id: DbId, tag_ids: &[DbId]) -> StoreResult<()>;
}
