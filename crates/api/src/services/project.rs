//! Project service: CRUD, tag association, slug uniqueness, icon upload.

use std::sync::Arc;

use depot_core::error::CoreError;
use depot_core::pagination::{paginate, Paginated, DEFAULT_PAGE_SIZE};
use depot_core::types::DbId;
use depot_db::models::project::{
    CreateProject, NewProject, Project, ProjectFilter, ProjectPatch, ProjectStatus, UpdateProject,
};
use depot_db::repositories::traits::ProjectStore;
use serde_json::json;
use validator::Validate;

use super::{store_error, validation_error};
use crate::storage::{self, BlobStore};

#[derive(Clone)]
pub struct ProjectService {
    store: Arc<dyn ProjectStore>,
    blobs: Arc<dyn BlobStore>,
}

impl ProjectService {
    pub fn new(store: Arc<dyn ProjectStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { store, blobs }
    }

    /// Paginated project listing with the filters from [`ProjectFilter`].
    pub async fn list(&self, filter: &ProjectFilter) -> Result<Paginated<Project>, CoreError> {
        let window = paginate(
            filter.page.unwrap_or(1),
            filter.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        );
        let (items, total) = self.store.list(filter, window).await.map_err(store_error)?;
        Ok(Paginated::new(items, total, &window))
    }

    pub async fn get(&self, id: DbId) -> Result<Project, CoreError> {
        self.store
            .find_by_id(id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| CoreError::not_found("Project", id))
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Project, CoreError> {
        self.store
            .find_by_slug(slug)
            .await
            .map_err(store_error)?
            .ok_or_else(|| CoreError::not_found("Project", slug))
    }

    pub async fn create(&self, input: CreateProject) -> Result<Project, CoreError> {
        input.validate().map_err(validation_error)?;

        if !self
            .store
            .is_slug_unique(&input.slug, None)
            .await
            .map_err(store_error)?
        {
            return Err(CoreError::Conflict(format!(
                "Project with slug \"{}\" already exists",
                input.slug
            )));
        }

        let new = NewProject {
            name: input.name,
            slug: input.slug,
            description: input.description,
            image_url: input.image_url,
            emoji: input.emoji,
            status: input.status.unwrap_or(ProjectStatus::Active),
            owner_id: input.owner_id,
            lifecycle_stages: input.lifecycle_stages.unwrap_or_default(),
            metadata: input.metadata.unwrap_or_else(|| json!({})),
        };
        let created = self.store.create(&new).await.map_err(store_error)?;

        // Associate-then-reload: if the association fails independently, the
        // project still exists without its tags. No rollback is attempted.
        if let Some(tag_ids) = &input.tag_ids {
            if !tag_ids.is_empty() {
                self.store
                    .set_tags(created.id, tag_ids)
                    .await
                    .map_err(store_error)?;
            }
        }

        self.get(created.id).await
    }

    pub async fn update(&self, id: DbId, input: UpdateProject) -> Result<Project, CoreError> {
        input.validate().map_err(validation_error)?;
        let current = self.get(id).await?;

        // Uniqueness is only re-checked when the slug actually changes.
        if let Some(slug) = &input.slug {
            if *slug != current.slug
                && !self
                    .store
                    .is_slug_unique(slug, Some(id))
                    .await
                    .map_err(store_error)?
            {
                return Err(CoreError::Conflict(format!(
                    "Project with slug \"{slug}\" already exists"
                )));
            }
        }

        let patch = ProjectPatch {
            name: input.name,
            slug: input.slug,
            description: input.description,
            image_url: input.image_url,
            emoji: input.emoji,
            status: input.status,
            owner_id: input.owner_id,
            lifecycle_stages: input.lifecycle_stages,
            metadata: input.metadata,
        };
        self.store
            .update(id, &patch)
            .await
            .map_err(store_error)?
            .ok_or_else(|| CoreError::not_found("Project", id))?;

        // A present tag list replaces the full set; an empty list clears it.
        if let Some(tag_ids) = &input.tag_ids {
            self.store
                .set_tags(id, tag_ids)
                .await
                .map_err(store_error)?;
        }

        self.get(id).await
    }

    pub async fn remove(&self, id: DbId) -> Result<(), CoreError> {
        if !self.store.soft_delete(id).await.map_err(store_error)? {
            return Err(CoreError::not_found("Project", id));
        }
        Ok(())
    }

    /// Existence probe used by the release service to validate project
    /// references without loading the entity.
    pub async fn exists(&self, id: DbId) -> Result<bool, CoreError> {
        self.store.exists(id).await.map_err(store_error)
    }

    /// Validate and persist an uploaded icon, then point `image_url` at it.
    pub async fn upload_icon(
        &self,
        id: DbId,
        bytes: &[u8],
        mime_type: &str,
        original_name: Option<&str>,
    ) -> Result<Project, CoreError> {
        self.get(id).await?;
        storage::validate_icon_upload(bytes.len(), mime_type)?;

        let saved = self
            .blobs
            .save(bytes, mime_type, original_name)
            .await
            .map_err(|err| CoreError::Internal(err.to_string()))?;

        let patch = ProjectPatch {
            image_url: Some(saved.public_url),
            ..Default::default()
        };
        self.store
            .update(id, &patch)
            .await
            .map_err(store_error)?
            .ok_or_else(|| CoreError::not_found("Project", id))?;

        self.get(id).await
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use depot_db::models::project::{LifecycleStage, ProjectSortBy, SortOrder};
    use serde_json::json;
    use uuid::Uuid;

    use super::*;
    use crate::services::testing::project_service;

    fn create_input(name: &str, slug: &str) -> CreateProject {
        CreateProject {
            name: name.into(),
            slug: slug.into(),
            description: None,
            image_url: None,
            emoji: None,
            status: None,
            owner_id: None,
            lifecycle_stages: None,
            tag_ids: None,
            metadata: None,
        }
    }

    // -- create --

    #[tokio::test]
    async fn create_applies_defaults() {
        let (service, _) = project_service();
        let project = service.create(create_input("Demo", "demo")).await.unwrap();

        assert_eq!(project.status, ProjectStatus::Active);
        assert!(project.lifecycle_stages.is_empty());
        assert_eq!(*project.metadata, json!({}));
        assert!(project.tags.is_empty());
    }

    #[tokio::test]
    async fn create_rejects_empty_name() {
        let (service, _) = project_service();
        let result = service.create(create_input("", "demo")).await;
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn create_associates_tags() {
        let (service, _) = project_service();
        let mut input = create_input("Demo", "demo");
        let tag_id = Uuid::new_v4();
        input.tag_ids = Some(vec![tag_id]);
        input.lifecycle_stages = Some(vec![LifecycleStage::Development]);

        let project = service.create(input).await.unwrap();
        assert_eq!(project.tags.len(), 1);
        assert_eq!(project.tags[0].id, tag_id);
        assert_eq!(
            *project.lifecycle_stages,
            vec![LifecycleStage::Development]
        );
    }

    // -- slug uniqueness --

    #[tokio::test]
    async fn duplicate_slug_rejected() {
        let (service, _) = project_service();
        service.create(create_input("One", "x")).await.unwrap();

        let result = service.create(create_input("Two", "x")).await;
        assert_matches!(result, Err(CoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn slug_reusable_after_soft_delete() {
        let (service, _) = project_service();
        let first = service.create(create_input("One", "x")).await.unwrap();
        assert_matches!(
            service.create(create_input("Two", "x")).await,
            Err(CoreError::Conflict(_))
        );

        service.remove(first.id).await.unwrap();
        let third = service.create(create_input("Three", "x")).await.unwrap();
        assert_eq!(third.slug, "x");
    }

    // -- update --

    #[tokio::test]
    async fn update_changes_only_supplied_fields() {
        let (service, _) = project_service();
        let mut input = create_input("Demo", "demo");
        input.description = Some("first".into());
        let project = service.create(input).await.unwrap();

        let updated = service
            .update(
                project.id,
                UpdateProject {
                    name: Some("Renamed".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.slug, "demo");
        assert_eq!(updated.description.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn update_to_taken_slug_rejected() {
        let (service, _) = project_service();
        service.create(create_input("One", "one")).await.unwrap();
        let other = service.create(create_input("Two", "two")).await.unwrap();

        let result = service
            .update(
                other.id,
                UpdateProject {
                    slug: Some("one".into()),
                    ..Default::default()
                },
            )
            .await;
        assert_matches!(result, Err(CoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_to_own_slug_is_a_noop() {
        let (service, _) = project_service();
        let project = service.create(create_input("One", "one")).await.unwrap();

        let updated = service
            .update(
                project.id,
                UpdateProject {
                    slug: Some("one".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.slug, "one");
    }

    #[tokio::test]
    async fn update_replaces_tag_set_when_present() {
        let (service, _) = project_service();
        let mut input = create_input("Demo", "demo");
        input.tag_ids = Some(vec![Uuid::new_v4(), Uuid::new_v4()]);
        let project = service.create(input).await.unwrap();
        assert_eq!(project.tags.len(), 2);

        let replacement = Uuid::new_v4();
        let updated = service
            .update(
                project.id,
                UpdateProject {
                    tag_ids: Some(vec![replacement]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.tags.len(), 1);
        assert_eq!(updated.tags[0].id, replacement);

        // An explicitly empty list clears the association.
        let cleared = service
            .update(
                project.id,
                UpdateProject {
                    tag_ids: Some(vec![]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(cleared.tags.is_empty());
    }

    #[tokio::test]
    async fn update_without_tag_ids_keeps_tags() {
        let (service, _) = project_service();
        let mut input = create_input("Demo", "demo");
        input.tag_ids = Some(vec![Uuid::new_v4()]);
        let project = service.create(input).await.unwrap();

        let updated = service
            .update(
                project.id,
                UpdateProject {
                    name: Some("Renamed".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.tags.len(), 1);
    }

    // -- soft delete --

    #[tokio::test]
    async fn soft_deleted_project_disappears() {
        let (service, _) = project_service();
        let project = service.create(create_input("Demo", "demo")).await.unwrap();

        service.remove(project.id).await.unwrap();

        assert_matches!(service.get(project.id).await, Err(CoreError::NotFound { .. }));
        assert_matches!(
            service.get_by_slug("demo").await,
            Err(CoreError::NotFound { .. })
        );
        assert!(!service.exists(project.id).await.unwrap());

        let listed = service.list(&ProjectFilter::default()).await.unwrap();
        assert_eq!(listed.total, 0);
    }

    #[tokio::test]
    async fn remove_missing_project_not_found() {
        let (service, _) = project_service();
        assert_matches!(
            service.remove(Uuid::new_v4()).await,
            Err(CoreError::NotFound { .. })
        );
    }

    // -- list --

    #[tokio::test]
    async fn list_pages_in_creation_order_descending() {
        let (service, _) = project_service();
        service.create(create_input("A", "a")).await.unwrap();
        let b = service.create(create_input("B", "b")).await.unwrap();
        service.create(create_input("C", "c")).await.unwrap();

        let filter = ProjectFilter {
            page: Some(2),
            page_size: Some(1),
            ..Default::default()
        };
        let result = service.list(&filter).await.unwrap();

        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].id, b.id);
        assert_eq!(result.total, 3);
        assert_eq!(result.total_pages, 3);
        assert_eq!(result.page, 2);
        assert_eq!(result.page_size, 1);
    }

    #[tokio::test]
    async fn list_filters_by_status_and_search() {
        let (service, _) = project_service();
        let mut archived = create_input("Old Portal", "old-portal");
        archived.status = Some(ProjectStatus::Archived);
        service.create(archived).await.unwrap();
        service
            .create(create_input("New Portal", "new-portal"))
            .await
            .unwrap();

        let by_status = service
            .list(&ProjectFilter {
                status: Some(ProjectStatus::Archived),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_status.total, 1);
        assert_eq!(by_status.items[0].name, "Old Portal");

        let by_search = service
            .list(&ProjectFilter {
                search: Some("PORTAL".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_search.total, 2);
    }

    #[tokio::test]
    async fn list_filters_by_tag_overlap() {
        let (service, _) = project_service();
        let wanted = Uuid::new_v4();
        let mut tagged = create_input("Tagged", "tagged");
        tagged.tag_ids = Some(vec![wanted, Uuid::new_v4()]);
        service.create(tagged).await.unwrap();
        service.create(create_input("Plain", "plain")).await.unwrap();

        let result = service
            .list(&ProjectFilter {
                tag_ids: Some(vec![wanted]),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.items[0].name, "Tagged");
    }

    #[tokio::test]
    async fn list_sorts_by_requested_field() {
        let (service, _) = project_service();
        service.create(create_input("Bravo", "bravo")).await.unwrap();
        service.create(create_input("Alpha", "alpha")).await.unwrap();

        let result = service
            .list(&ProjectFilter {
                sort_by: Some(ProjectSortBy::Name),
                sort_order: Some(SortOrder::Asc),
                ..Default::default()
            })
            .await
            .unwrap();
        let names: Vec<_> = result.items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Bravo"]);
    }

    // -- icon upload --

    #[tokio::test]
    async fn upload_icon_persists_public_url() {
        let (service, blobs) = project_service();
        let project = service.create(create_input("Demo", "demo")).await.unwrap();

        let updated = service
            .upload_icon(project.id, &[1, 2, 3], "image/png", Some("logo.png"))
            .await
            .unwrap();

        assert_eq!(
            updated.image_url.as_deref(),
            Some("/api/uploads/project-icons/fake.png")
        );
        assert_eq!(blobs.saved.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn upload_icon_rejects_bad_mime_type() {
        let (service, blobs) = project_service();
        let project = service.create(create_input("Demo", "demo")).await.unwrap();

        let result = service
            .upload_icon(project.id, &[1], "application/pdf", None)
            .await;
        assert_matches!(result, Err(CoreError::Validation(_)));
        assert!(blobs.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn upload_icon_rejects_oversized_file() {
        let (service, _) = project_service();
        let project = service.create(create_input("Demo", "demo")).await.unwrap();

        let oversized = vec![0u8; crate::storage::ICON_MAX_SIZE_BYTES + 1];
        let result = service
            .upload_icon(project.id, &oversized, "image/png", None)
            .await;
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn upload_icon_requires_existing_project() {
        let (service, _) = project_service();
        let result = service
            .upload_icon(Uuid::new_v4(), &[1], "image/png", None)
            .await;
        assert_matches!(result, Err(CoreError::NotFound { .. }));
    }
}
