//! Project entity model and DTOs.

use depot_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

use crate::models::tag::Tag;

/// Project lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "project_status", rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Archived,
    Suspended,
}

/// An environment a project targets. Unrelated to release status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleStage {
    Development,
    Testing,
    Staging,
    Production,
}

/// A project row from the `projects` table, with its tags loaded.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    /// Unique, URL-safe, human-readable key. Mutable, unlike `id`.
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub emoji: Option<String>,
    pub status: ProjectStatus,
    pub owner_id: Option<DbId>,
    pub lifecycle_stages: Json<Vec<LifecycleStage>>,
    pub metadata: Json<Value>,
    /// Populated by the repository after the row query.
    #[sqlx(skip)]
    pub tags: Vec<Tag>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 255))]
    pub slug: String,
    pub description: Option<String>,
    #[validate(length(max = 2048))]
    pub image_url: Option<String>,
    #[validate(length(max = 20))]
    pub emoji: Option<String>,
    /// Defaults to `active` if omitted.
    pub status: Option<ProjectStatus>,
    pub owner_id: Option<DbId>,
    pub lifecycle_stages: Option<Vec<LifecycleStage>>,
    pub tag_ids: Option<Vec<DbId>>,
    pub metadata: Option<Value>,
}

/// DTO for updating an existing project. All fields are optional; a present
/// `tag_ids` (including an empty list) replaces the full tag set.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProject {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub slug: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 2048))]
    pub image_url: Option<String>,
    #[validate(length(max = 20))]
    pub emoji: Option<String>,
    pub status: Option<ProjectStatus>,
    pub owner_id: Option<DbId>,
    pub lifecycle_stages: Option<Vec<LifecycleStage>>,
    pub tag_ids: Option<Vec<DbId>>,
    pub metadata: Option<Value>,
}

/// Fully-resolved fields for a project insert, with defaults applied.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub emoji: Option<String>,
    pub status: ProjectStatus,
    pub owner_id: Option<DbId>,
    pub lifecycle_stages: Vec<LifecycleStage>,
    pub metadata: Value,
}

/// Column-level patch applied by `ProjectStore::update`. Tag association is
/// a separate store call, so there is no `tag_ids` here.
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub emoji: Option<String>,
    pub status: Option<ProjectStatus>,
    pub owner_id: Option<DbId>,
    pub lifecycle_stages: Option<Vec<LifecycleStage>>,
    pub metadata: Option<Value>,
}

/// Sort field for project listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectSortBy {
    CreatedAt,
    UpdatedAt,
    Name,
    Slug,
}

impl ProjectSortBy {
    /// The whitelisted column this sort key maps to.
    pub fn column(self) -> &'static str {
        match self {
            ProjectSortBy::CreatedAt => "created_at",
            ProjectSortBy::UpdatedAt => "updated_at",
            ProjectSortBy::Name => "name",
            ProjectSortBy::Slug => "slug",
        }
    }
}

/// Sort direction for project listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Filters for listing projects.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub owner_id: Option<DbId>,
    pub status: Option<ProjectStatus>,
    /// Case-insensitive substring match over name, slug, and description.
    pub search: Option<String>,
    /// Keep projects having at least one of these tags.
    pub tag_ids: Option<Vec<DbId>>,
    /// Defaults to `created_at`.
    pub sort_by: Option<ProjectSortBy>,
    /// Defaults to descending.
    pub sort_order: Option<SortOrder>,
}
