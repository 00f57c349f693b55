use depot_core::pagination::PageWindow;
use depot_core::types::DbId;

use crate::error::StoreResult;
use crate::models::tag::{CreateTag, Tag, TagFilter, UpdateTag};

/// Persistence operations for tags. Tags have no soft delete; removal is
/// physical and name uniqueness is global.
#[async_trait::async_trait]
pub trait TagStore: Send + Sync + 'static {
    /// Filtered page of tags plus the total matching count.
    async fn list(&self, filter: &TagFilter, window: PageWindow) -> StoreResult<(Vec<Tag>, i64)>;

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Tag>>;

    async fn create(&self, new: &CreateTag) -> StoreResult<Tag>;

    /// Apply the non-`None` fields of `patch`. Returns `None` when no row
    /// with the given id exists.
    async fn update(&self, id: DbId, patch: &UpdateTag) -> StoreResult<Option<Tag>>;

    /// Physically delete the row. Returns `true` if a row was removed.
    async fn delete(&self, id: DbId) -> StoreResult<bool>;

    /// Whether `name` is unused, optionally ignoring one id.
    async fn is_name_unique(&self, name: &str, exclude_id: Option<DbId>) -> StoreResult<bool>;
}
