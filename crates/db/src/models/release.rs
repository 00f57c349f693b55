//! Release entity model and DTOs.

use depot_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

/// Release delivery status.
///
/// No transition graph is enforced: `update_status` accepts any status from
/// any status, which keeps manual overrides possible. The only enforced
/// transition is `update_structure` always landing on `Created`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "release_status", rename_all = "lowercase")]
pub enum ReleaseStatus {
    Draft,
    Created,
    Delivering,
    Delivered,
    Failed,
}

/// A release row from the `releases` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Release {
    pub id: DbId,
    pub project_id: DbId,
    pub version: String,
    /// Reference to the build artifact this release's structure was
    /// snapshotted from; supplied by an external collaborator.
    pub snapshot_id: Option<DbId>,
    pub status: ReleaseStatus,
    pub changelog: Option<String>,
    pub notes: Option<String>,
    pub structure: Json<Value>,
    pub metadata: Json<Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new release under a project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRelease {
    /// Strict semver; validated at the service layer.
    #[validate(length(min = 1, max = 50))]
    pub version: String,
    pub changelog: Option<String>,
    pub notes: Option<String>,
    pub structure: Option<Value>,
    pub metadata: Option<Value>,
}

/// DTO for updating an existing release. All fields are optional. Also used
/// as the column-level patch for `ReleaseStore::update`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRelease {
    pub status: Option<ReleaseStatus>,
    pub snapshot_id: Option<DbId>,
    pub changelog: Option<String>,
    pub notes: Option<String>,
    pub structure: Option<Value>,
    pub metadata: Option<Value>,
}

/// Fully-resolved fields for a release insert, with defaults applied.
#[derive(Debug, Clone)]
pub struct NewRelease {
    pub project_id: DbId,
    pub version: String,
    pub status: ReleaseStatus,
    pub changelog: Option<String>,
    pub notes: Option<String>,
    pub structure: Value,
    pub metadata: Value,
}

/// Filters for listing a project's releases.
#[derive(Debug, Clone, Default)]
pub struct ReleaseFilter {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub status: Option<ReleaseStatus>,
    /// Case-insensitive substring match on the version string.
    pub version: Option<String>,
}
