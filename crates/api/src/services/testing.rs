//! In-memory store fakes for service tests.
//!
//! The fakes mirror the live-row semantics of the Postgres repositories:
//! soft-deleted rows disappear from reads, the unique indexes are enforced
//! on insert, and list ordering follows `created_at`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use depot_core::pagination::PageWindow;
use depot_core::types::{DbId, Timestamp};
use depot_db::models::project::{
    NewProject, Project, ProjectFilter, ProjectPatch, ProjectSortBy, SortOrder,
};
use depot_db::models::release::{NewRelease, Release, ReleaseFilter, UpdateRelease};
use depot_db::models::tag::{CreateTag, Tag, TagFilter, UpdateTag};
use depot_db::repositories::traits::{ProjectStore, ReleaseStore, TagStore};
use depot_db::{StoreError, StoreResult};
use sqlx::types::Json;
use uuid::Uuid;

use crate::services::{ProjectService, ReleaseService, TagService};
use crate::storage::{BlobStore, SavedBlob, StorageError};

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn page<T>(items: Vec<T>, window: PageWindow) -> (Vec<T>, i64) {
    let total = items.len() as i64;
    let page = items
        .into_iter()
        .skip(window.skip as usize)
        .take(window.take as usize)
        .collect();
    (page, total)
}

/// Placeholder tag used when materializing fake project associations.
fn stub_tag(id: DbId, at: Timestamp) -> Tag {
    Tag {
        id,
        name: format!("tag-{id}"),
        description: None,
        color: None,
        created_at: at,
        updated_at: at,
    }
}

// ---------------------------------------------------------------------------
// Project store
// ---------------------------------------------------------------------------

struct ProjectRow {
    project: Project,
    tag_ids: Vec<DbId>,
    deleted: bool,
}

#[derive(Default)]
pub struct FakeProjectStore {
    rows: Mutex<HashMap<DbId, ProjectRow>>,
    seq: AtomicI64,
}

impl FakeProjectStore {
    /// Monotonic fake clock so creation order shows up in `created_at`.
    fn tick(&self) -> Timestamp {
        let tick = self.seq.fetch_add(1, Ordering::SeqCst);
        Utc.timestamp_opt(1_700_000_000 + tick, 0).unwrap()
    }

    fn materialize(row: &ProjectRow) -> Project {
        let mut project = row.project.clone();
        project.tags = row
            .tag_ids
            .iter()
            .map(|id| stub_tag(*id, project.created_at))
            .collect();
        project
    }
}

#[async_trait::async_trait]
impl ProjectStore for FakeProjectStore {
    async fn list(
        &self,
        filter: &ProjectFilter,
        window: PageWindow,
    ) -> StoreResult<(Vec<Project>, i64)> {
        let rows = self.rows.lock().unwrap();
        let mut matches: Vec<Project> = rows
            .values()
            .filter(|row| !row.deleted)
            .filter(|row| {
                filter
                    .owner_id
                    .is_none_or(|owner| row.project.owner_id == Some(owner))
            })
            .filter(|row| filter.status.is_none_or(|s| row.project.status == s))
            .filter(|row| {
                filter.search.as_ref().is_none_or(|needle| {
                    contains_ci(&row.project.name, needle)
                        || contains_ci(&row.project.slug, needle)
                        || row
                            .project
                            .description
                            .as_ref()
                            .is_some_and(|d| contains_ci(d, needle))
                })
            })
            .filter(|row| {
                filter
                    .tag_ids
                    .as_ref()
                    .is_none_or(|wanted| wanted.iter().any(|id| row.tag_ids.contains(id)))
            })
            .map(Self::materialize)
            .collect();

        let order = filter.sort_order.unwrap_or(SortOrder::Desc);
        match filter.sort_by.unwrap_or(ProjectSortBy::CreatedAt) {
            ProjectSortBy::CreatedAt => matches.sort_by_key(|p| p.created_at),
            ProjectSortBy::UpdatedAt => matches.sort_by_key(|p| p.updated_at),
            ProjectSortBy::Name => matches.sort_by(|a, b| a.name.cmp(&b.name)),
            ProjectSortBy::Slug => matches.sort_by(|a, b| a.slug.cmp(&b.slug)),
        }
        if order == SortOrder::Desc {
            matches.reverse();
        }

        Ok(page(matches, window))
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Project>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .get(&id)
            .filter(|row| !row.deleted)
            .map(Self::materialize))
    }

    async fn find_by_slug(&self, slug: &str) -> StoreResult<Option<Project>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .values()
            .find(|row| !row.deleted && row.project.slug == slug)
            .map(Self::materialize))
    }

    async fn create(&self, new: &NewProject) -> StoreResult<Project> {
        let now = self.tick();
        let mut rows = self.rows.lock().unwrap();
        if rows
            .values()
            .any(|row| !row.deleted && row.project.slug == new.slug)
        {
            return Err(StoreError::UniqueViolation {
                constraint: "uq_projects_slug".into(),
            });
        }

        let project = Project {
            id: Uuid::new_v4(),
            name: new.name.clone(),
            slug: new.slug.clone(),
            description: new.description.clone(),
            image_url: new.image_url.clone(),
            emoji: new.emoji.clone(),
            status: new.status,
            owner_id: new.owner_id,
            lifecycle_stages: Json(new.lifecycle_stages.clone()),
            metadata: Json(new.metadata.clone()),
            tags: vec![],
            created_at: now,
            updated_at: now,
        };
        rows.insert(
            project.id,
            ProjectRow {
                project: project.clone(),
                tag_ids: vec![],
                deleted: false,
            },
        );
        Ok(project)
    }

    async fn update(&self, id: DbId, patch: &ProjectPatch) -> StoreResult<Option<Project>> {
        let now = self.tick();
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.get_mut(&id).filter(|row| !row.deleted) else {
            return Ok(None);
        };

        let p = &mut row.project;
        if let Some(name) = &patch.name {
            p.name = name.clone();
        }
        if let Some(slug) = &patch.slug {
            p.slug = slug.clone();
        }
        if let Some(description) = &patch.description {
            p.description = Some(description.clone());
        }
        if let Some(image_url) = &patch.image_url {
            p.image_url = Some(image_url.clone());
        }
        if let Some(emoji) = &patch.emoji {
            p.emoji = Some(emoji.clone());
        }
        if let Some(status) = patch.status {
            p.status = status;
        }
        if let Some(owner_id) = patch.owner_id {
            p.owner_id = Some(owner_id);
        }
        if let Some(stages) = &patch.lifecycle_stages {
            p.lifecycle_stages = Json(stages.clone());
        }
        if let Some(metadata) = &patch.metadata {
            p.metadata = Json(metadata.clone());
        }
        p.updated_at = now;
        Ok(Some(Self::materialize(row)))
    }

    async fn soft_delete(&self, id: DbId) -> StoreResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&id).filter(|row| !row.deleted) {
            Some(row) => {
                row.deleted = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn exists(&self, id: DbId) -> StoreResult<bool> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.get(&id).is_some_and(|row| !row.deleted))
    }

    async fn is_slug_unique(&self, slug: &str, exclude_id: Option<DbId>) -> StoreResult<bool> {
        let rows = self.rows.lock().unwrap();
        Ok(!rows.values().any(|row| {
            !row.deleted && row.project.slug == slug && Some(row.project.id) != exclude_id
        }))
    }

    async fn set_tags(&self, project_id: DbId, tag_ids: &[DbId]) -> StoreResult<()> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.get_mut(&project_id) {
            row.tag_ids = tag_ids.to_vec();
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Release store
// ---------------------------------------------------------------------------

struct ReleaseRow {
    release: Release,
    deleted: bool,
}

#[derive(Default)]
pub struct FakeReleaseStore {
    rows: Mutex<HashMap<DbId, ReleaseRow>>,
    seq: AtomicI64,
}

impl FakeReleaseStore {
    fn tick(&self) -> Timestamp {
        let tick = self.seq.fetch_add(1, Ordering::SeqCst);
        Utc.timestamp_opt(1_700_000_000 + tick, 0).unwrap()
    }
}

#[async_trait::async_trait]
impl ReleaseStore for FakeReleaseStore {
    async fn list(
        &self,
        project_id: DbId,
        filter: &ReleaseFilter,
        window: PageWindow,
    ) -> StoreResult<(Vec<Release>, i64)> {
        let rows = self.rows.lock().unwrap();
        let mut matches: Vec<Release> = rows
            .values()
            .filter(|row| !row.deleted && row.release.project_id == project_id)
            .filter(|row| filter.status.is_none_or(|s| row.release.status == s))
            .filter(|row| {
                filter
                    .version
                    .as_ref()
                    .is_none_or(|needle| contains_ci(&row.release.version, needle))
            })
            .map(|row| row.release.clone())
            .collect();

        matches.sort_by_key(|r| r.created_at);
        matches.reverse();
        Ok(page(matches, window))
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Release>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .get(&id)
            .filter(|row| !row.deleted)
            .map(|row| row.release.clone()))
    }

    async fn create(&self, new: &NewRelease) -> StoreResult<Release> {
        let now = self.tick();
        let mut rows = self.rows.lock().unwrap();
        if rows.values().any(|row| {
            !row.deleted
                && row.release.project_id == new.project_id
                && row.release.version == new.version
        }) {
            return Err(StoreError::UniqueViolation {
                constraint: "uq_releases_project_version".into(),
            });
        }

        let release = Release {
            id: Uuid::new_v4(),
            project_id: new.project_id,
            version: new.version.clone(),
            snapshot_id: None,
            status: new.status,
            changelog: new.changelog.clone(),
            notes: new.notes.clone(),
            structure: Json(new.structure.clone()),
            metadata: Json(new.metadata.clone()),
            created_at: now,
            updated_at: now,
        };
        rows.insert(
            release.id,
            ReleaseRow {
                release: release.clone(),
                deleted: false,
            },
        );
        Ok(release)
    }

    async fn update(&self, id: DbId, patch: &UpdateRelease) -> StoreResult<Option<Release>> {
        let now = self.tick();
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.get_mut(&id).filter(|row| !row.deleted) else {
            return Ok(None);
        };

        let r = &mut row.release;
        if let Some(status) = patch.status {
            r.status = status;
        }
        if let Some(snapshot_id) = patch.snapshot_id {
            r.snapshot_id = Some(snapshot_id);
        }
        if let Some(changelog) = &patch.changelog {
            r.changelog = Some(changelog.clone());
        }
        if let Some(notes) = &patch.notes {
            r.notes = Some(notes.clone());
        }
        if let Some(structure) = &patch.structure {
            r.structure = Json(structure.clone());
        }
        if let Some(metadata) = &patch.metadata {
            r.metadata = Json(metadata.clone());
        }
        r.updated_at = now;
        Ok(Some(r.clone()))
    }

    async fn soft_delete(&self, id: DbId) -> StoreResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&id).filter(|row| !row.deleted) {
            Some(row) => {
                row.deleted = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn is_version_unique(
        &self,
        project_id: DbId,
        version: &str,
        exclude_id: Option<DbId>,
    ) -> StoreResult<bool> {
        let rows = self.rows.lock().unwrap();
        Ok(!rows.values().any(|row| {
            !row.deleted
                && row.release.project_id == project_id
                && row.release.version == version
                && Some(row.release.id) != exclude_id
        }))
    }
}

// ---------------------------------------------------------------------------
// Tag store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeTagStore {
    rows: Mutex<HashMap<DbId, Tag>>,
    seq: AtomicI64,
}

impl FakeTagStore {
    fn tick(&self) -> Timestamp {
        let tick = self.seq.fetch_add(1, Ordering::SeqCst);
        Utc.timestamp_opt(1_700_000_000 + tick, 0).unwrap()
    }
}

#[async_trait::async_trait]
impl TagStore for FakeTagStore {
    async fn list(&self, filter: &TagFilter, window: PageWindow) -> StoreResult<(Vec<Tag>, i64)> {
        let rows = self.rows.lock().unwrap();
        let mut matches: Vec<Tag> = rows
            .values()
            .filter(|tag| {
                filter
                    .search
                    .as_ref()
                    .is_none_or(|needle| contains_ci(&tag.name, needle))
            })
            .cloned()
            .collect();

        matches.sort_by_key(|t| t.created_at);
        matches.reverse();
        Ok(page(matches, window))
    }

    async fn find_by_id(&self, id: DbId) -> StoreResult<Option<Tag>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.get(&id).cloned())
    }

    async fn create(&self, new: &CreateTag) -> StoreResult<Tag> {
        let now = self.tick();
        let mut rows = self.rows.lock().unwrap();
        if rows.values().any(|tag| tag.name == new.name) {
            return Err(StoreError::UniqueViolation {
                constraint: "uq_tags_name".into(),
            });
        }

        let tag = Tag {
            id: Uuid::new_v4(),
            name: new.name.clone(),
            description: new.description.clone(),
            color: new.color.clone(),
            created_at: now,
            updated_at: now,
        };
        rows.insert(tag.id, tag.clone());
        Ok(tag)
    }

    async fn update(&self, id: DbId, patch: &UpdateTag) -> StoreResult<Option<Tag>> {
        let now = self.tick();
        let mut rows = self.rows.lock().unwrap();
        let Some(tag) = rows.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = &patch.name {
            tag.name = name.clone();
        }
        if let Some(description) = &patch.description {
            tag.description = Some(description.clone());
        }
        if let Some(color) = &patch.color {
            tag.color = Some(color.clone());
        }
        tag.updated_at = now;
        Ok(Some(tag.clone()))
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.remove(&id).is_some())
    }

    async fn is_name_unique(&self, name: &str, exclude_id: Option<DbId>) -> StoreResult<bool> {
        let rows = self.rows.lock().unwrap();
        Ok(!rows
            .values()
            .any(|tag| tag.name == name && Some(tag.id) != exclude_id))
    }
}

// ---------------------------------------------------------------------------
// Blob store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeBlobStore {
    pub saved: Mutex<Vec<(usize, String)>>,
}

#[async_trait::async_trait]
impl BlobStore for FakeBlobStore {
    async fn save(
        &self,
        bytes: &[u8],
        mime_type: &str,
        _original_name: Option<&str>,
    ) -> Result<SavedBlob, StorageError> {
        self.saved
            .lock()
            .unwrap()
            .push((bytes.len(), mime_type.to_string()));
        Ok(SavedBlob {
            public_url: "/api/uploads/project-icons/fake.png".into(),
            storage_key: "project-icons/fake.png".into(),
        })
    }
}

// ---------------------------------------------------------------------------
// Harness constructors
// ---------------------------------------------------------------------------

pub fn project_service() -> (ProjectService, Arc<FakeBlobStore>) {
    let blobs = Arc::new(FakeBlobStore::default());
    let service = ProjectService::new(Arc::new(FakeProjectStore::default()), blobs.clone());
    (service, blobs)
}

pub fn release_service() -> (ReleaseService, ProjectService) {
    let (projects, _) = project_service();
    let releases = ReleaseService::new(Arc::new(FakeReleaseStore::default()), projects.clone());
    (releases, projects)
}

pub fn tag_service() -> TagService {
    TagService::new(Arc::new(FakeTagStore::default()))
}
