//! Tag service: CRUD with global name uniqueness and color validation.

use std::sync::Arc;

use depot_core::error::CoreError;
use depot_core::pagination::{paginate, Paginated, DEFAULT_PAGE_SIZE};
use depot_core::types::DbId;
use depot_core::validation::validate_hex_color;
use depot_db::models::tag::{CreateTag, Tag, TagFilter, UpdateTag};
use depot_db::repositories::traits::TagStore;
use validator::Validate;

use super::{store_error, validation_error};

#[derive(Clone)]
pub struct TagService {
    store: Arc<dyn TagStore>,
}

impl TagService {
    pub fn new(store: Arc<dyn TagStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, filter: &TagFilter) -> Result<Paginated<Tag>, CoreError> {
        let window = paginate(
            filter.page.unwrap_or(1),
            filter.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        );
        let (items, total) = self.store.list(filter, window).await.map_err(store_error)?;
        Ok(Paginated::new(items, total, &window))
    }

    pub async fn get(&self, id: DbId) -> Result<Tag, CoreError> {
        self.store
            .find_by_id(id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| CoreError::not_found("Tag", id))
    }

    pub async fn create(&self, input: CreateTag) -> Result<Tag, CoreError> {
        input.validate().map_err(validation_error)?;
        if let Some(color) = &input.color {
            validate_hex_color(color)?;
        }

        if !self
            .store
            .is_name_unique(&input.name, None)
            .await
            .map_err(store_error)?
        {
            return Err(CoreError::Conflict(format!(
                "Tag with name \"{}\" already exists",
                input.name
            )));
        }

        self.store.create(&input).await.map_err(store_error)
    }

    pub async fn update(&self, id: DbId, input: UpdateTag) -> Result<Tag, CoreError> {
        input.validate().map_err(validation_error)?;
        if let Some(color) = &input.color {
            validate_hex_color(color)?;
        }

        let current = self.get(id).await?;

        // Uniqueness is only re-checked when the name actually changes, so a
        // same-name update stays a no-op.
        if let Some(name) = &input.name {
            if *name != current.name
                && !self
                    .store
                    .is_name_unique(name, Some(id))
                    .await
                    .map_err(store_error)?
            {
                return Err(CoreError::Conflict(format!(
                    "Tag with name \"{name}\" already exists"
                )));
            }
        }

        self.store
            .update(id, &input)
            .await
            .map_err(store_error)?
            .ok_or_else(|| CoreError::not_found("Tag", id))
    }

    /// Physically delete the tag; there is no soft delete for tags.
    pub async fn remove(&self, id: DbId) -> Result<(), CoreError> {
        self.get(id).await?;
        if !self.store.delete(id).await.map_err(store_error)? {
            return Err(CoreError::not_found("Tag", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use uuid::Uuid;

    use super::*;
    use crate::services::testing::tag_service;

    fn create_input(name: &str) -> CreateTag {
        CreateTag {
            name: name.into(),
            description: None,
            color: None,
        }
    }

    // -- create --

    #[tokio::test]
    async fn create_and_get_round_trip() {
        let service = tag_service();
        let tag = service.create(create_input("frontend")).await.unwrap();
        let fetched = service.get(tag.id).await.unwrap();
        assert_eq!(fetched.name, "frontend");
    }

    #[tokio::test]
    async fn duplicate_name_rejected() {
        let service = tag_service();
        service.create(create_input("frontend")).await.unwrap();
        let result = service.create(create_input("frontend")).await;
        assert_matches!(result, Err(CoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn valid_color_accepted_and_bad_color_rejected() {
        let service = tag_service();

        let mut good = create_input("good");
        good.color = Some("#FF5733".into());
        assert!(service.create(good).await.is_ok());

        let mut bad = create_input("bad");
        bad.color = Some("red".into());
        assert_matches!(service.create(bad).await, Err(CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn empty_name_rejected() {
        let service = tag_service();
        assert_matches!(
            service.create(create_input("")).await,
            Err(CoreError::Validation(_))
        );
    }

    // -- update --

    #[tokio::test]
    async fn rename_to_taken_name_rejected() {
        let service = tag_service();
        service.create(create_input("frontend")).await.unwrap();
        let other = service.create(create_input("backend")).await.unwrap();

        let result = service
            .update(
                other.id,
                UpdateTag {
                    name: Some("frontend".into()),
                    ..Default::default()
                },
            )
            .await;
        assert_matches!(result, Err(CoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn same_name_update_is_a_noop() {
        let service = tag_service();
        let tag = service.create(create_input("frontend")).await.unwrap();

        let updated = service
            .update(
                tag.id,
                UpdateTag {
                    name: Some("frontend".into()),
                    description: Some("ui work".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "frontend");
        assert_eq!(updated.description.as_deref(), Some("ui work"));
    }

    #[tokio::test]
    async fn update_missing_tag_not_found() {
        let service = tag_service();
        let result = service.update(Uuid::new_v4(), UpdateTag::default()).await;
        assert_matches!(result, Err(CoreError::NotFound { .. }));
    }

    // -- remove --

    #[tokio::test]
    async fn remove_is_physical_and_frees_the_name() {
        let service = tag_service();
        let tag = service.create(create_input("frontend")).await.unwrap();

        service.remove(tag.id).await.unwrap();
        assert_matches!(service.get(tag.id).await, Err(CoreError::NotFound { .. }));

        // Physical deletion frees the name immediately.
        assert!(service.create(create_input("frontend")).await.is_ok());
    }

    // -- list --

    #[tokio::test]
    async fn list_searches_case_insensitively() {
        let service = tag_service();
        service.create(create_input("Frontend")).await.unwrap();
        service.create(create_input("backend")).await.unwrap();
        service.create(create_input("infra")).await.unwrap();

        let result = service
            .list(&TagFilter {
                search: Some("END".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(result.total, 2);
    }

    #[tokio::test]
    async fn list_orders_by_creation_descending() {
        let service = tag_service();
        service.create(create_input("first")).await.unwrap();
        service.create(create_input("second")).await.unwrap();

        let result = service.list(&TagFilter::default()).await.unwrap();
        let names: Vec<_> = result.items.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["second", "first"]);
    }
}
