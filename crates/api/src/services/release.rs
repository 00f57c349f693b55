//! Release service: project-scoped CRUD, version uniqueness, status and
//! structure lifecycle.

use std::sync::Arc;

use depot_core::error::CoreError;
use depot_core::pagination::{paginate, Paginated, DEFAULT_PAGE_SIZE};
use depot_core::structure::{self, StructureView};
use depot_core::types::DbId;
use depot_core::version;
use depot_db::models::release::{
    CreateRelease, NewRelease, Release, ReleaseFilter, ReleaseStatus, UpdateRelease,
};
use depot_db::repositories::traits::ReleaseStore;
use serde_json::{json, Value};
use validator::Validate;

use super::{store_error, validation_error, ProjectService};

#[derive(Clone)]
pub struct ReleaseService {
    store: Arc<dyn ReleaseStore>,
    projects: ProjectService,
}

impl ReleaseService {
    pub fn new(store: Arc<dyn ReleaseStore>, projects: ProjectService) -> Self {
        Self { store, projects }
    }

    /// Paginated listing of a project's releases. The project must exist.
    pub async fn list(
        &self,
        project_id: DbId,
        filter: &ReleaseFilter,
    ) -> Result<Paginated<Release>, CoreError> {
        if !self.projects.exists(project_id).await? {
            return Err(CoreError::not_found("Project", project_id));
        }

        let window = paginate(
            filter.page.unwrap_or(1),
            filter.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        );
        let (items, total) = self
            .store
            .list(project_id, filter, window)
            .await
            .map_err(store_error)?;
        Ok(Paginated::new(items, total, &window))
    }

    /// Get a release. When a project scope is supplied, a release belonging
    /// to a different project reports NotFound rather than leaking its
    /// existence.
    pub async fn get(&self, id: DbId, project_id: Option<DbId>) -> Result<Release, CoreError> {
        let release = self
            .store
            .find_by_id(id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| CoreError::not_found("Release", id))?;

        if let Some(project_id) = project_id {
            if release.project_id != project_id {
                return Err(CoreError::not_found("Release", id));
            }
        }
        Ok(release)
    }

    pub async fn create(
        &self,
        project_id: DbId,
        input: CreateRelease,
    ) -> Result<Release, CoreError> {
        input.validate().map_err(validation_error)?;
        version::validate_version(&input.version)?;

        if !self.projects.exists(project_id).await? {
            return Err(CoreError::not_found("Project", project_id));
        }
        if !self
            .store
            .is_version_unique(project_id, &input.version, None)
            .await
            .map_err(store_error)?
        {
            return Err(CoreError::Conflict(format!(
                "Release with version \"{}\" already exists for this project",
                input.version
            )));
        }

        let new = NewRelease {
            project_id,
            version: input.version,
            status: ReleaseStatus::Draft,
            changelog: input.changelog,
            notes: input.notes,
            structure: input.structure.unwrap_or_else(|| json!({})),
            metadata: input.metadata.unwrap_or_else(|| json!({})),
        };
        let created = self.store.create(&new).await.map_err(store_error)?;
        self.get(created.id, None).await
    }

    pub async fn update(
        &self,
        id: DbId,
        input: UpdateRelease,
        project_id: Option<DbId>,
    ) -> Result<Release, CoreError> {
        self.get(id, project_id).await?;

        self.store
            .update(id, &input)
            .await
            .map_err(store_error)?
            .ok_or_else(|| CoreError::not_found("Release", id))?;
        self.get(id, None).await
    }

    /// Attach a fresh structure snapshot, supplied by the build pipeline.
    ///
    /// Always lands on `Created`, whatever the current status.
    pub async fn update_structure(
        &self,
        id: DbId,
        snapshot_id: DbId,
        structure: Value,
    ) -> Result<Release, CoreError> {
        self.get(id, None).await?;

        let patch = UpdateRelease {
            status: Some(ReleaseStatus::Created),
            snapshot_id: Some(snapshot_id),
            structure: Some(structure),
            ..Default::default()
        };
        self.store
            .update(id, &patch)
            .await
            .map_err(store_error)?
            .ok_or_else(|| CoreError::not_found("Release", id))?;
        self.get(id, None).await
    }

    /// Overwrite the status. Any status may follow any other.
    pub async fn update_status(
        &self,
        id: DbId,
        status: ReleaseStatus,
    ) -> Result<Release, CoreError> {
        self.get(id, None).await?;

        let patch = UpdateRelease {
            status: Some(status),
            ..Default::default()
        };
        self.store
            .update(id, &patch)
            .await
            .map_err(store_error)?
            .ok_or_else(|| CoreError::not_found("Release", id))?;
        self.get(id, None).await
    }

    pub async fn remove(&self, id: DbId, project_id: Option<DbId>) -> Result<(), CoreError> {
        self.get(id, project_id).await?;
        if !self.store.soft_delete(id).await.map_err(store_error)? {
            return Err(CoreError::not_found("Release", id));
        }
        Ok(())
    }

    /// Shape the stored structure document into its caller-facing view.
    ///
    /// Fails NotFound when the release (or its project) is gone, and when
    /// the stored document is absent (an empty object).
    pub async fn get_structure(&self, id: DbId) -> Result<StructureView, CoreError> {
        let release = self.get(id, None).await?;
        let project = self.projects.get(release.project_id).await?;

        if structure::is_absent(&release.structure) {
            return Err(CoreError::not_found("ReleaseStructure", id));
        }

        Ok(StructureView::from_stored(
            release.project_id,
            project.name,
            release.version,
            release.snapshot_id,
            &release.structure,
        ))
    }
}
