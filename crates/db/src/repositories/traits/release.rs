use depot_core::pagination::PageWindow;
use depot_core::types::DbId;

use crate::error::StoreResult;
use crate::models::release::{NewRelease, Release, ReleaseFilter, UpdateRelease};

/// Persistence operations for releases. Every read excludes soft-deleted
/// rows.
#[async_trait::async_trait]
pub trait ReleaseStore: Send + Sync + 'static {
    /// Filtered page of a single project's releases plus the total count.
    async fn list(
        &self,
        project_id: DbId,
        filter: &ReleaseFilter,
        window: PageWindow,
    ) -> StoreResult<(Vec<Release>, i64)>;

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Release>>;

    async fn create(&self, new: &NewRelease) -> StoreResult<Release>;

    /// Apply the non-`None` fields of `patch`. Returns `None` when no live
    /// row with the given id exists.
    async fn update(&self, id: DbId, patch: &UpdateRelease) -> StoreResult<Option<Release>>;

    /// Mark the row deleted. Returns `true` if a live row was affected.
    async fn soft_delete(&self, id: DbId) -> StoreResult<bool>;

    /// Whether `version` is unused among the project's live releases,
    /// optionally ignoring one id.
    async fn is_version_unique(
        &self,
        project_id: DbId,
        version: &str,
        exclude_id: Option<DbId>,
    ) -> StoreResult<bool>;
}
