//! Tag entity model and DTOs.

use depot_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A tag row from the `tags` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tag {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new tag.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTag {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
    /// `#RRGGBB` hex color; validated at the service layer.
    pub color: Option<String>,
}

/// DTO for updating an existing tag. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTag {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

/// Filters for listing tags.
#[derive(Debug, Clone, Default)]
pub struct TagFilter {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    /// Case-insensitive substring match on the tag name.
    pub search: Option<String>,
}
